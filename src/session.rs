use crate::auth::AuthService;
use crate::error::{Error, GenerationContext, Result};
use crate::llm::{self, GenerativeBackend};
use crate::prompt::{self, ReportConfig, ReportRequest};
use crate::types::{
    DetailedSectorAnalysis, GenerationMode, Language, PendingAction, ProductAnalysis,
    ReportFilters, SubscriptionTier, TrendReport, UserProfile,
};

/// Lifecycle of one view slot. A single value per slot enforces the
/// idle/loading/success/error mutual exclusion.
#[derive(Debug, Clone)]
pub enum Phase<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Phase<T> {
    fn default() -> Self {
        Phase::Idle
    }
}

impl<T> Phase<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Phase::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A phase slot guarded by a request sequence. Overlapping requests against
/// the same slot resolve last-writer-wins: a completion only lands while its
/// ticket is still the active request.
#[derive(Debug)]
struct Slot<T> {
    phase: Phase<T>,
    seq: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot {
            phase: Phase::Idle,
            seq: 0,
        }
    }
}

impl<T> Slot<T> {
    /// Enter loading and claim a completion ticket, invalidating any
    /// in-flight request on this slot.
    fn begin(&mut self) -> u64 {
        self.seq += 1;
        self.phase = Phase::Loading;
        self.seq
    }

    /// Apply a completion if the ticket still owns the slot.
    fn complete(&mut self, ticket: u64, phase: Phase<T>) -> bool {
        if ticket != self.seq {
            log::debug!(
                "dropping stale completion (ticket {ticket}, active {})",
                self.seq
            );
            return false;
        }
        self.phase = phase;
        true
    }

    /// Close the slot. Also invalidates in-flight completions so a late
    /// resolution cannot reopen it.
    fn reset(&mut self) {
        self.seq += 1;
        self.phase = Phase::Idle;
    }
}

/// Session-global state read by every generation call. Injected at
/// construction so tests can supply fixtures; no ambient singletons.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub user: Option<UserProfile>,
    pub language: Language,
    /// Forecast horizon in months: 1, 3 or 6.
    pub selected_period: u32,
    pub mode: GenerationMode,
    pub filters: ReportFilters,
    pub config: ReportConfig,
}

impl Default for AppContext {
    fn default() -> Self {
        AppContext {
            user: None,
            language: Language::En,
            selected_period: 1,
            mode: GenerationMode::Reliable,
            filters: ReportFilters::default(),
            config: ReportConfig::default(),
        }
    }
}

/// Outcome of a gated sector-analysis trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorGate {
    /// No authenticated user: open the sign-in prompt. Nothing else changed.
    AuthRequired,
    /// Free tier: the request was queued and the upgrade prompt should open.
    UpgradeRequired,
    /// The generation call ran; inspect the sector slot for the result.
    Completed,
}

/// The three-level drill-down state machine: report, sector modal, product
/// modal, each an independent slot.
pub struct Session {
    context: AppContext,
    auth: AuthService,
    report: Slot<TrendReport>,
    sector: Slot<DetailedSectorAnalysis>,
    product: Slot<ProductAnalysis>,
    pending: Option<PendingAction>,
    last_error: Option<String>,
}

impl Session {
    /// Build a session, restoring the persisted user unless the context
    /// already carries one.
    pub fn new(auth: AuthService, mut context: AppContext) -> Result<Self> {
        if context.user.is_none() {
            context.user = auth.load_session()?;
        }
        Ok(Session {
            context,
            auth,
            report: Slot::default(),
            sector: Slot::default(),
            product: Slot::default(),
            pending: None,
            last_error: None,
        })
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.context
    }

    pub fn report(&self) -> &Phase<TrendReport> {
        &self.report.phase
    }

    pub fn sector_analysis(&self) -> &Phase<DetailedSectorAnalysis> {
        &self.sector.phase
    }

    pub fn product_analysis(&self) -> &Phase<ProductAnalysis> {
        &self.product.phase
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Take the published modal-failure message, if any (a dismissable toast).
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    fn current_tier(&self) -> SubscriptionTier {
        self.context
            .user
            .as_ref()
            .map(|u| u.subscription_tier)
            .unwrap_or(SubscriptionTier::Free)
    }

    /// Generate (or regenerate) the top-level report. Entering loading clears
    /// any previous report or error; the slot ends Ready or Failed.
    pub async fn generate_report(&mut self, backend: &dyn GenerativeBackend) {
        let request = ReportRequest {
            period_in_months: self.context.selected_period,
            tier: self.current_tier(),
            language: self.context.language,
            mode: self.context.mode,
            filters: self.context.filters.clone(),
        };
        let ticket = self.report.begin();

        let built = prompt::report_request(
            &request,
            &self.context.config,
            chrono::Local::now().date_naive(),
        );
        let generation = match built {
            Ok(generation) => generation,
            Err(e) => {
                self.report.complete(ticket, Phase::Failed(e.to_string()));
                return;
            }
        };

        let outcome =
            llm::generate::<TrendReport>(backend, &generation, GenerationContext::Report).await;
        match outcome {
            Ok(data) => {
                self.report.complete(ticket, Phase::Ready(data));
            }
            Err(e) => {
                self.report.complete(ticket, Phase::Failed(e.to_string()));
            }
        }
    }

    /// Drill into one sector. Anonymous users get the sign-in prompt; free
    /// users get the upgrade prompt with the request queued for replay.
    pub async fn analyze_sector(
        &mut self,
        backend: &dyn GenerativeBackend,
        sector_name: &str,
    ) -> SectorGate {
        self.analyze_sector_inner(backend, sector_name, false).await
    }

    async fn analyze_sector_inner(
        &mut self,
        backend: &dyn GenerativeBackend,
        sector_name: &str,
        force: bool,
    ) -> SectorGate {
        let Some(user) = &self.context.user else {
            return SectorGate::AuthRequired;
        };
        if user.subscription_tier == SubscriptionTier::Free && !force {
            self.pending = Some(PendingAction::AnalyzeSector {
                sector_name: sector_name.to_string(),
            });
            return SectorGate::UpgradeRequired;
        }

        let generation = prompt::sector_request(
            sector_name,
            self.context.language,
            &self.context.config,
            self.context.mode,
        );
        let ticket = self.sector.begin();
        let outcome = llm::generate::<DetailedSectorAnalysis>(
            backend,
            &generation,
            GenerationContext::SectorAnalysis,
        )
        .await;
        match outcome {
            Ok(data) => {
                self.sector.complete(ticket, Phase::Ready(data));
            }
            Err(e) => {
                // The modal never lingers with stale data: close it and
                // publish the message instead.
                if self.sector.complete(ticket, Phase::Idle) {
                    self.last_error = Some(e.to_string());
                }
            }
        }
        SectorGate::Completed
    }

    /// Drill into one product from an open sector analysis. Closes the
    /// sector modal; no further premium check at this level.
    pub async fn analyze_product(&mut self, backend: &dyn GenerativeBackend, product_name: &str) {
        self.sector.reset();
        let generation =
            prompt::product_request(product_name, self.context.language, self.context.mode);
        let ticket = self.product.begin();
        let outcome = llm::generate::<ProductAnalysis>(
            backend,
            &generation,
            GenerationContext::ProductAnalysis,
        )
        .await;
        match outcome {
            Ok(data) => {
                self.product.complete(ticket, Phase::Ready(data));
            }
            Err(e) => {
                if self.product.complete(ticket, Phase::Idle) {
                    self.last_error = Some(e.to_string());
                }
            }
        }
    }

    pub fn close_sector(&mut self) {
        self.sector.reset();
    }

    pub fn close_product(&mut self) {
        self.product.reset();
    }

    /// Finish the upgrade flow: persist the tier transition, then replay a
    /// queued sector analysis exactly once. The replay only fires on an
    /// actual free-to-premium transition and consumes the pending action.
    pub async fn complete_upgrade(&mut self, backend: &dyn GenerativeBackend) -> Result<()> {
        let Some(user) = &self.context.user else {
            return Err(Error::AuthRequired);
        };
        let was_free = user.subscription_tier == SubscriptionTier::Free;
        let upgraded = self.auth.upgrade(user)?;
        self.context.user = Some(upgraded);

        if was_free {
            if let Some(PendingAction::AnalyzeSector { sector_name }) = self.pending.take() {
                self.analyze_sector_inner(backend, &sector_name, true).await;
            }
        }
        Ok(())
    }

    pub fn sign_up(&mut self, name: &str, email: &str, password: &str) -> Result<()> {
        let profile = self.auth.sign_up(name, email, password)?;
        self.context.user = Some(profile);
        Ok(())
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let profile = self.auth.login(email, password)?;
        self.context.user = Some(profile);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.auth.logout()?;
        self.context.user = None;
        self.pending = None;
        Ok(())
    }

    pub fn save_settings(&mut self, profile: UserProfile) -> Result<()> {
        self.auth.save_settings(&profile)?;
        self.context.user = Some(profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::test_support::ScriptedBackend;
    use crate::store::MemoryStore;

    const REPORT_JSON: &str = r#"{
        "sectors": [
            {
                "sectorName": "Technology",
                "products": [
                    {
                        "name": "Solar charger",
                        "demandRate": 18.5,
                        "regions": "Europe, North America",
                        "reasons": "Energy costs and outdoor travel",
                        "suppliers": ["SunCo", "Voltix"]
                    }
                ]
            }
        ],
        "globalAnalysis": "Tech demand keeps climbing."
    }"#;

    const SECTOR_JSON: &str = r#"{
        "sectorName": "Technology",
        "inDepthAnalysis": "A sector in rapid expansion.",
        "productSuggestions": [
            {
                "name": "Smart ring",
                "description": "Health tracking in a ring.",
                "targetAudience": "Fitness enthusiasts",
                "sellingPoints": ["Discreet", "Long battery"],
                "priceRange": "$150-$300",
                "suppliers": ["RingWorks"],
                "profitabilityScore": 8,
                "marketEntryDifficulty": "medium"
            }
        ]
    }"#;

    const PRODUCT_JSON: &str = r#"{
        "productName": "Smart ring",
        "marketAnalysis": "Growing niche with few incumbents.",
        "keyRegions": ["North America", "Japan"],
        "targetAudience": "Fitness enthusiasts",
        "sellingPoints": ["Discreet"],
        "priceRange": "$150-$300",
        "suppliers": ["RingWorks"],
        "risks": ["Component shortages"]
    }"#;

    fn anonymous_session() -> Session {
        let auth = AuthService::new(Box::new(MemoryStore::new()));
        Session::new(auth, AppContext::default()).unwrap()
    }

    fn session_with_user(tier: SubscriptionTier) -> Session {
        let mut session = anonymous_session();
        session.sign_up("Ada", "ada@example.com", "pw").unwrap();
        if tier == SubscriptionTier::Premium {
            if let Some(user) = &mut session.context.user {
                user.subscription_tier = SubscriptionTier::Premium;
            }
        }
        session
    }

    #[tokio::test]
    async fn test_generate_report_success() {
        let mut session = anonymous_session();
        let backend = ScriptedBackend::replying(REPORT_JSON);
        session.generate_report(&backend).await;

        let report = session.report().data().expect("report should be ready");
        assert_eq!(report.sectors.len(), 1);
        assert_eq!(report.sectors[0].sector_name, "Technology");
        assert_eq!(report.sectors[0].products[0].suppliers, vec!["SunCo", "Voltix"]);
    }

    #[tokio::test]
    async fn test_backend_failure_lands_in_error_slot() {
        let mut session = anonymous_session();
        let backend = ScriptedBackend::failing("network unreachable");
        session.generate_report(&backend).await;

        let message = session.report().error().expect("report should be failed");
        assert!(!message.is_empty());
        assert!(message.contains("network unreachable"));
        assert!(session.report().data().is_none());
        assert!(!session.report().is_loading());
    }

    #[tokio::test]
    async fn test_malformed_response_does_not_populate_state() {
        let mut session = anonymous_session();
        let backend = ScriptedBackend::replying("{\"sectors\": [");
        session.generate_report(&backend).await;

        let message = session.report().error().expect("report should be failed");
        assert!(message.contains("malformed"));
        assert!(session.report().data().is_none());
    }

    #[tokio::test]
    async fn test_regenerate_replaces_previous_report() {
        let mut session = anonymous_session();
        session
            .generate_report(&ScriptedBackend::replying(REPORT_JSON))
            .await;
        assert!(session.report().data().is_some());

        session
            .generate_report(&ScriptedBackend::failing("down"))
            .await;
        assert!(session.report().data().is_none());
        assert!(session.report().error().is_some());
    }

    #[tokio::test]
    async fn test_anonymous_sector_analysis_requires_auth() {
        let mut session = anonymous_session();
        let backend = ScriptedBackend::replying(SECTOR_JSON);

        let gate = session.analyze_sector(&backend, "Technology").await;
        assert_eq!(gate, SectorGate::AuthRequired);
        assert_eq!(backend.call_count(), 0);
        assert!(session.pending_action().is_none());
        assert!(session.sector_analysis().is_idle());
    }

    #[tokio::test]
    async fn test_free_tier_queues_pending_action_without_calling() {
        let mut session = session_with_user(SubscriptionTier::Free);
        let backend = ScriptedBackend::replying(SECTOR_JSON);

        let gate = session.analyze_sector(&backend, "Technology").await;
        assert_eq!(gate, SectorGate::UpgradeRequired);
        assert_eq!(backend.call_count(), 0);
        assert_eq!(
            session.pending_action(),
            Some(&PendingAction::AnalyzeSector {
                sector_name: "Technology".to_string()
            })
        );
        assert!(session.sector_analysis().is_idle());
    }

    #[tokio::test]
    async fn test_upgrade_replays_pending_action_exactly_once() {
        let mut session = session_with_user(SubscriptionTier::Free);
        let backend = ScriptedBackend::new(vec![
            Ok(SECTOR_JSON.to_string()),
            Ok(SECTOR_JSON.to_string()),
        ]);

        session.analyze_sector(&backend, "Technology").await;
        assert_eq!(backend.call_count(), 0);

        session.complete_upgrade(&backend).await.unwrap();
        assert_eq!(backend.call_count(), 1);
        assert!(backend.prompts.lock().unwrap()[0].contains("Technology"));
        assert!(session.pending_action().is_none());
        assert!(session.sector_analysis().data().is_some());

        // A later upgrade completion must not refire anything.
        session.complete_upgrade(&backend).await.unwrap();
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_upgrade_without_pending_action_fires_nothing() {
        let mut session = session_with_user(SubscriptionTier::Free);
        let backend = ScriptedBackend::replying(SECTOR_JSON);
        session.complete_upgrade(&backend).await.unwrap();
        assert_eq!(backend.call_count(), 0);
        assert_eq!(
            session.context().user.as_ref().unwrap().subscription_tier,
            SubscriptionTier::Premium
        );
    }

    #[tokio::test]
    async fn test_premium_sector_analysis_runs_directly() {
        let mut session = session_with_user(SubscriptionTier::Premium);
        let backend = ScriptedBackend::replying(SECTOR_JSON);

        let gate = session.analyze_sector(&backend, "Technology").await;
        assert_eq!(gate, SectorGate::Completed);
        assert_eq!(backend.call_count(), 1);
        let analysis = session.sector_analysis().data().unwrap();
        assert_eq!(analysis.product_suggestions[0].name, "Smart ring");
    }

    #[tokio::test]
    async fn test_sector_failure_closes_modal_and_publishes_message() {
        let mut session = session_with_user(SubscriptionTier::Premium);
        let backend = ScriptedBackend::failing("quota exceeded");

        session.analyze_sector(&backend, "Technology").await;
        assert!(session.sector_analysis().is_idle());
        let message = session.take_error().expect("failure should be published");
        assert!(message.contains("sector analysis"));
        assert!(session.take_error().is_none());
    }

    #[tokio::test]
    async fn test_product_drilldown_closes_sector_modal() {
        let mut session = session_with_user(SubscriptionTier::Premium);
        session
            .analyze_sector(&ScriptedBackend::replying(SECTOR_JSON), "Technology")
            .await;
        assert!(session.sector_analysis().data().is_some());

        session
            .analyze_product(&ScriptedBackend::replying(PRODUCT_JSON), "Smart ring")
            .await;
        assert!(session.sector_analysis().is_idle());
        let analysis = session.product_analysis().data().unwrap();
        assert_eq!(analysis.product_name, "Smart ring");
    }

    #[tokio::test]
    async fn test_product_failure_closes_modal() {
        let mut session = session_with_user(SubscriptionTier::Premium);
        session
            .analyze_product(&ScriptedBackend::failing("boom"), "Smart ring")
            .await;
        assert!(session.product_analysis().is_idle());
        assert!(session.take_error().is_some());
    }

    #[tokio::test]
    async fn test_logout_clears_user_and_pending_action() {
        let mut session = session_with_user(SubscriptionTier::Free);
        session
            .analyze_sector(&ScriptedBackend::replying(SECTOR_JSON), "Technology")
            .await;
        assert!(session.pending_action().is_some());

        session.logout().unwrap();
        assert!(session.context().user.is_none());
        assert!(session.pending_action().is_none());
    }

    #[test]
    fn test_stale_completion_never_clobbers_newer_request() {
        let mut slot: Slot<i32> = Slot::default();
        let first = slot.begin();
        let second = slot.begin();

        assert!(!slot.complete(first, Phase::Ready(1)));
        assert!(slot.phase.is_loading());

        assert!(slot.complete(second, Phase::Ready(2)));
        assert_eq!(slot.phase.data(), Some(&2));

        // A stale failure must not overwrite the newer success either.
        assert!(!slot.complete(first, Phase::Failed("late".into())));
        assert_eq!(slot.phase.data(), Some(&2));
    }

    #[test]
    fn test_reset_invalidates_inflight_ticket() {
        let mut slot: Slot<i32> = Slot::default();
        let ticket = slot.begin();
        slot.reset();
        assert!(!slot.complete(ticket, Phase::Ready(1)));
        assert!(slot.phase.is_idle());
    }

    #[test]
    fn test_session_restores_persisted_user() {
        let store = MemoryStore::new();
        let auth = AuthService::new(Box::new(store));
        auth.sign_up("Ada", "ada@example.com", "pw").unwrap();
        let session = Session::new(auth, AppContext::default()).unwrap();
        assert_eq!(
            session.context().user.as_ref().map(|u| u.name.as_str()),
            Some("Ada")
        );
    }
}
