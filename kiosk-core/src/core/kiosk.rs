//! Kiosk facade
//!
//! The one place that routes visitor actions to the components. Each
//! operation:
//!
//! 1. mutates the session through the owning component
//! 2. turns validation rejections into a localized notification
//! 3. returns the [`UiEffect`]s the presentation layer should apply
//!
//! Time is always passed in (`now_ms`); the facade never reads a clock.

use super::config::Config;
use super::session::{Preferences, Session};
use crate::gesture::{SwipeBounds, SwipeDecision, SwipeRecognizer};
use crate::navigation::{NavOutcome, StepState};
use crate::orders::summarize;
use crate::services::{
    CatalogProvider, LogNotifier, Notifier, Severity, StaticCatalog, Translations, Translator,
};
use crate::watchdog::{IdleWatchdog, TimerToken, WatchdogEvent, WatchdogState};
use crate::wizard::{CommitOutcome, CustomizationWizard, WizardMode, WizardStep};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{KioskError, KioskResult};
use shared::models::{
    ALL_CATEGORIES, CatalogItem, GridDensity, ItemKind, Locale, OrderType, PriceRange, Step,
};
use shared::order::{LineId, OrderSummary, PaymentForm, PaymentMethod, PaymentOutcome};
use std::sync::Arc;

/// Why the session was thrown away
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    IdleTimeout,
    StartOver,
    Explicit,
}

impl ResetReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetReason::IdleTimeout => "idle_timeout",
            ResetReason::StartOver => "start_over",
            ResetReason::Explicit => "explicit",
        }
    }
}

/// Identifies one payment attempt of one session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PaymentTicket {
    pub epoch: u64,
    pub id: u64,
}

/// Instruction for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    StepChanged { from: Step, to: Step },
    ScrollToTop,
    CartChanged { item_count: i64 },
    LineCommitted(CommitOutcome),
    WizardOpened { item_id: i64, mode: WizardMode },
    WizardClosed,
    PreferencesChanged(Preferences),
    IdleWarning { remaining_secs: u32 },
    IdleWarningDismissed,
    SessionReset { epoch: u64, reason: ResetReason },
    PaymentStarted(PaymentTicket),
    PaymentSucceeded,
    PaymentFailed(KioskError),
}

/// External collaborators of the kiosk
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn CatalogProvider>,
    pub translator: Arc<dyn Translator>,
    pub notifier: Arc<dyn Notifier>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            catalog: Arc::new(StaticCatalog::builtin()),
            translator: Arc::new(Translations::builtin()),
            notifier: Arc::new(LogNotifier),
        }
    }
}

impl Collaborators {
    /// Load catalog and translations from the configured files, falling back
    /// to the built-in data when a path is not set
    pub fn from_config(config: &Config) -> KioskResult<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => StaticCatalog::load(path)?,
            None => StaticCatalog::builtin(),
        };
        let translations = match &config.translations_path {
            Some(path) => Translations::load(path)?,
            None => Translations::builtin(),
        };
        Ok(Self {
            catalog: Arc::new(catalog),
            translator: Arc::new(translations.with_default_locale(config.default_locale)),
            notifier: Arc::new(LogNotifier),
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

fn severity_of(err: &KioskError) -> Severity {
    match err {
        KioskError::InvalidPaymentForm(_)
        | KioskError::PaymentDeclined(_)
        | KioskError::ItemNotFound(_)
        | KioskError::DataLoad(_) => Severity::Error,
        KioskError::CustomizationRequired(_) => Severity::Info,
        _ => Severity::Warning,
    }
}

pub struct Kiosk {
    config: Config,
    session: Session,
    watchdog: IdleWatchdog,
    swipe: SwipeRecognizer,
    wizard: Option<CustomizationWizard>,
    pending_payment: Option<PaymentTicket>,
    next_ticket: u64,
    catalog: Arc<dyn CatalogProvider>,
    translator: Arc<dyn Translator>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Kiosk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kiosk")
            .field("step", &self.session.current_step())
            .field("epoch", &self.session.epoch())
            .field("cart_lines", &self.session.cart().len())
            .field("watchdog", &self.watchdog.state())
            .field("wizard_open", &self.wizard.is_some())
            .field("pending_payment", &self.pending_payment)
            .finish()
    }
}

impl Kiosk {
    /// Build a kiosk and arm the idle watchdog at `now_ms`
    pub fn new(config: Config, collaborators: Collaborators, now_ms: i64) -> Self {
        let mut watchdog = IdleWatchdog::new(config.watchdog);
        watchdog.start(now_ms);
        Self {
            session: Session::new(&config),
            swipe: SwipeRecognizer::new(config.swipe),
            watchdog,
            wizard: None,
            pending_payment: None,
            next_ticket: 0,
            catalog: collaborators.catalog,
            translator: collaborators.translator,
            notifier: collaborators.notifier,
            config,
        }
    }

    // ========== Queries ==========

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_step(&self) -> Step {
        self.session.current_step()
    }

    pub fn cart(&self) -> &crate::orders::Cart {
        self.session.cart()
    }

    pub fn watchdog(&self) -> &IdleWatchdog {
        &self.watchdog
    }

    pub fn wizard(&self) -> Option<&CustomizationWizard> {
        self.wizard.as_ref()
    }

    /// Direct access to the open wizard (selections, quantity, note)
    pub fn wizard_mut(&mut self) -> Option<&mut CustomizationWizard> {
        self.wizard.as_mut()
    }

    pub fn pending_payment(&self) -> Option<PaymentTicket> {
        self.pending_payment
    }

    /// Totals of the current cart, full precision
    pub fn order_summary(&self) -> OrderSummary {
        summarize(self.session.cart().lines(), self.config.tax_rate)
    }

    pub fn step_state(&self, step: Step) -> StepState {
        self.session
            .navigator()
            .step_state(step, self.session.cart().is_empty())
    }

    /// Translate a key in the visitor's current locale
    pub fn translate(&self, key: &str) -> String {
        self.translator.translate(self.session.locale(), key)
    }

    // ========== Notifications ==========

    fn notify_key(&self, key: &str, severity: Severity) {
        self.notifier.notify(&self.translate(key), severity);
    }

    fn reject(&self, err: &KioskError) {
        tracing::warn!(code = %err.code(), error = %err, "Operation rejected");
        self.notify_key(err.message_key(), severity_of(err));
    }

    fn cart_changed(&self) -> UiEffect {
        UiEffect::CartChanged {
            item_count: self.session.cart().item_count(),
        }
    }

    // ========== Navigation ==========

    fn nav_effects(&self, outcome: NavOutcome) -> Vec<UiEffect> {
        match outcome {
            NavOutcome::Moved { from, to } => {
                vec![UiEffect::StepChanged { from, to }, UiEffect::ScrollToTop]
            }
            NavOutcome::MovedWithWarning { from, to } => {
                self.notify_key(KioskError::CartEmpty.message_key(), Severity::Warning);
                vec![UiEffect::StepChanged { from, to }, UiEffect::ScrollToTop]
            }
            NavOutcome::Blocked(_) => {
                self.reject(&KioskError::CartEmpty);
                Vec::new()
            }
            NavOutcome::Unchanged => Vec::new(),
        }
    }

    /// Jump to a step (step indicator, buttons)
    ///
    /// Steps outside the configured flow are ignored.
    pub fn go_to(&mut self, step: Step) -> Vec<UiEffect> {
        let cart_empty = self.session.cart().is_empty();
        match self.session.navigator_mut().go_to(step, cart_empty) {
            Ok(outcome) => self.nav_effects(outcome),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring navigation");
                Vec::new()
            }
        }
    }

    pub fn next_step(&mut self) -> Vec<UiEffect> {
        let cart_empty = self.session.cart().is_empty();
        let outcome = self.session.navigator_mut().next(cart_empty);
        self.nav_effects(outcome)
    }

    pub fn previous_step(&mut self) -> Vec<UiEffect> {
        let outcome = self.session.navigator_mut().previous();
        self.nav_effects(outcome)
    }

    // ========== Intro ==========

    /// Welcome screen: pick a language and continue
    pub fn select_language(&mut self, locale: Locale) -> Vec<UiEffect> {
        self.session.change_locale(locale);
        let mut effects = vec![UiEffect::PreferencesChanged(*self.session.preferences())];
        if self.current_step() == Step::Welcome {
            effects.extend(self.go_to(Step::OrderType));
        }
        effects
    }

    /// Order type screen: dine in / takeaway, then the menu
    pub fn choose_order_type(&mut self, order_type: OrderType) -> Vec<UiEffect> {
        self.session.set_order_type(order_type);
        tracing::debug!(?order_type, "Order type chosen");
        if self.current_step() == Step::OrderType {
            return self.go_to(Step::Food);
        }
        Vec::new()
    }

    pub fn back_to_welcome(&mut self) -> Vec<UiEffect> {
        self.go_to(Step::Welcome)
    }

    // ========== Preferences ==========

    pub fn change_locale(&mut self, locale: Locale) -> Vec<UiEffect> {
        self.session.change_locale(locale);
        vec![UiEffect::PreferencesChanged(*self.session.preferences())]
    }

    pub fn toggle_theme(&mut self) -> Vec<UiEffect> {
        self.session.toggle_theme();
        vec![UiEffect::PreferencesChanged(*self.session.preferences())]
    }

    pub fn toggle_view_mode(&mut self) -> Vec<UiEffect> {
        self.session.toggle_view_mode();
        vec![UiEffect::PreferencesChanged(*self.session.preferences())]
    }

    pub fn set_grid_density(&mut self, density: GridDensity) -> Vec<UiEffect> {
        self.session.set_grid_density(density);
        vec![UiEffect::PreferencesChanged(*self.session.preferences())]
    }

    // ========== Menu ==========

    /// Catalog items of one kind, filtered by the session's filter
    pub fn menu_items(&self, kind: ItemKind) -> Vec<CatalogItem> {
        self.session.filter(kind).apply(self.catalog.list_items(kind))
    }

    /// Filter bar categories, "all" first
    pub fn categories(&self, kind: ItemKind) -> Vec<String> {
        std::iter::once(ALL_CATEGORIES.to_string())
            .chain(self.catalog.categories(kind))
            .collect()
    }

    pub fn set_category(&mut self, kind: ItemKind, category: &str) {
        self.session.filter_mut(kind).set_category(category);
    }

    pub fn set_price_range(&mut self, kind: ItemKind, range: PriceRange) {
        self.session.filter_mut(kind).set_range(range);
    }

    pub fn set_price_window(&mut self, kind: ItemKind, min: Decimal, max: Decimal) {
        self.session.filter_mut(kind).set_price_window(min, max);
    }

    pub fn reset_filter(&mut self, kind: ItemKind) {
        self.session.filter_mut(kind).reset();
    }

    fn find_item(&self, item_id: i64) -> KioskResult<CatalogItem> {
        self.catalog
            .find_item(item_id)
            .ok_or(KioskError::ItemNotFound(item_id))
    }

    /// One tap "add": items with options open the wizard instead
    pub fn quick_add(&mut self, item_id: i64) -> Vec<UiEffect> {
        let item = match self.find_item(item_id) {
            Ok(item) => item,
            Err(e) => {
                self.reject(&e);
                return Vec::new();
            }
        };
        if item.has_options() {
            self.notify_key(
                KioskError::CustomizationRequired(item_id).message_key(),
                Severity::Info,
            );
            return self.open(CustomizationWizard::new(item));
        }

        let mut wizard = CustomizationWizard::new(item);
        while wizard.step() != WizardStep::Review {
            if let Err(e) = wizard.next() {
                self.reject(&e);
                return Vec::new();
            }
        }
        match wizard.commit(self.session.cart_mut()) {
            Ok(outcome) => {
                self.notify_key("item_added", Severity::Success);
                vec![UiEffect::LineCommitted(outcome), self.cart_changed()]
            }
            Err(e) => {
                self.reject(&e);
                Vec::new()
            }
        }
    }

    // ========== Wizard ==========

    fn open(&mut self, wizard: CustomizationWizard) -> Vec<UiEffect> {
        let effect = UiEffect::WizardOpened {
            item_id: wizard.item().id,
            mode: wizard.mode(),
        };
        tracing::debug!(item_id = wizard.item().id, mode = ?wizard.mode(), "Wizard opened");
        self.swipe.cancel();
        self.wizard = Some(wizard);
        vec![effect]
    }

    /// Start customizing a catalog item; replaces any open wizard
    pub fn open_wizard(&mut self, item_id: i64) -> Vec<UiEffect> {
        match self.find_item(item_id) {
            Ok(item) => self.open(CustomizationWizard::new(item)),
            Err(e) => {
                self.reject(&e);
                Vec::new()
            }
        }
    }

    /// Reopen an existing cart line for editing
    pub fn edit_line(&mut self, line_id: LineId) -> Vec<UiEffect> {
        let found = self
            .session
            .cart()
            .get(line_id)
            .ok_or(KioskError::LineNotFound(line_id))
            .and_then(|line| Ok((self.find_item(line.item_id)?, line.clone())));
        match found {
            Ok((item, line)) => self.open(CustomizationWizard::for_line(item, &line)),
            Err(e) => {
                self.reject(&e);
                Vec::new()
            }
        }
    }

    fn with_wizard<T>(
        &mut self,
        op: impl FnOnce(&mut CustomizationWizard) -> KioskResult<T>,
    ) -> Option<T> {
        let result = match self.wizard.as_mut() {
            Some(wizard) => op(wizard),
            None => Err(KioskError::WizardNotOpen),
        };
        result.map_err(|e| self.reject(&e)).ok()
    }

    /// Select / toggle a choice in the open wizard
    pub fn wizard_select(&mut self, group: &str, choice: &str) -> bool {
        self.with_wizard(|w| w.select_choice(group, choice)).is_some()
    }

    /// Advance the open wizard; notifies when a required group is unsatisfied
    pub fn wizard_next(&mut self) -> Option<WizardStep> {
        self.with_wizard(|w| w.next())
    }

    pub fn wizard_previous(&mut self) -> Option<WizardStep> {
        self.with_wizard(|w| Ok(w.previous()))
    }

    /// Commit the open wizard to the cart and close it
    ///
    /// On failure the wizard stays open and the cart is untouched.
    pub fn commit_wizard(&mut self) -> Vec<UiEffect> {
        let Some(wizard) = self.wizard.as_ref() else {
            self.reject(&KioskError::WizardNotOpen);
            return Vec::new();
        };
        match wizard.commit(self.session.cart_mut()) {
            Ok(outcome) => {
                self.wizard = None;
                let key = match outcome {
                    CommitOutcome::Added(_) => "item_added",
                    CommitOutcome::Updated(_) => "item_updated",
                };
                self.notify_key(key, Severity::Success);
                vec![
                    UiEffect::LineCommitted(outcome),
                    self.cart_changed(),
                    UiEffect::WizardClosed,
                ]
            }
            Err(e) => {
                self.reject(&e);
                Vec::new()
            }
        }
    }

    pub fn close_wizard(&mut self) -> Vec<UiEffect> {
        match self.wizard.take() {
            Some(_) => vec![UiEffect::WizardClosed],
            None => Vec::new(),
        }
    }

    // ========== Cart ==========

    pub fn update_quantity(&mut self, line_id: LineId, quantity: i32) -> Vec<UiEffect> {
        if !self.session.cart().contains(line_id) {
            return Vec::new();
        }
        self.session.cart_mut().update_quantity(line_id, quantity);
        vec![self.cart_changed()]
    }

    pub fn remove_line(&mut self, line_id: LineId) -> Vec<UiEffect> {
        if !self.session.cart().contains(line_id) {
            return Vec::new();
        }
        self.session.cart_mut().remove(line_id);
        self.notify_key("item_removed", Severity::Info);
        vec![self.cart_changed()]
    }

    pub fn clear_cart(&mut self) -> Vec<UiEffect> {
        self.session.cart_mut().clear();
        vec![self.cart_changed()]
    }

    // ========== Gestures ==========

    /// Swipes only drive the menu flow, and never under a modal
    pub fn gestures_enabled(&self) -> bool {
        !self.current_step().is_intro() && self.wizard.is_none() && !self.watchdog.is_warning()
    }

    fn swipe_bounds(&self) -> SwipeBounds {
        let nav = self.session.navigator();
        SwipeBounds {
            can_retreat: nav.can_swipe_back(),
            can_advance: nav.can_swipe_forward(),
        }
    }

    /// Returns whether the drag is being tracked
    pub fn pointer_down(&mut self, x: f64, now_ms: i64) -> bool {
        if !self.gestures_enabled() {
            return false;
        }
        self.swipe.start(x, now_ms)
    }

    /// Returns the damped offset to draw the page at
    pub fn pointer_move(&mut self, x: f64) -> f64 {
        let bounds = self.swipe_bounds();
        self.swipe.move_to(x, bounds)
    }

    pub fn pointer_up(&mut self, now_ms: i64) -> Vec<UiEffect> {
        if !self.swipe.is_active() {
            return Vec::new();
        }
        if !self.gestures_enabled() {
            self.swipe.cancel();
            return Vec::new();
        }
        let cart_empty = self.session.cart().is_empty();
        let outcome = match self.swipe.end(now_ms) {
            SwipeDecision::Advance => self.session.navigator_mut().advance(cart_empty),
            SwipeDecision::Retreat => self.session.navigator_mut().retreat(),
            SwipeDecision::BounceBack => NavOutcome::Unchanged,
        };
        self.nav_effects(outcome)
    }

    pub fn pointer_cancel(&mut self) {
        self.swipe.cancel();
    }

    // ========== Idle watchdog ==========

    /// Any visitor interaction; ignored while the idle warning shows
    pub fn register_activity(&mut self, now_ms: i64) -> bool {
        self.watchdog.on_activity(now_ms)
    }

    /// "I'm still here"
    pub fn still_here(&mut self, now_ms: i64) -> Vec<UiEffect> {
        if self.watchdog.still_here(now_ms) {
            vec![UiEffect::IdleWarningDismissed]
        } else {
            Vec::new()
        }
    }

    /// "Start over" from the idle warning
    pub fn start_over(&mut self, now_ms: i64) -> Vec<UiEffect> {
        if self.watchdog.start_over() {
            self.reset(now_ms, ResetReason::StartOver)
        } else {
            Vec::new()
        }
    }

    /// Handle a firing of the armed watchdog timer
    pub fn on_timer(&mut self, token: TimerToken, now_ms: i64) -> Vec<UiEffect> {
        let event = self.watchdog.on_timer(token, now_ms);
        self.watchdog_effects(event, now_ms)
    }

    /// Fire every watchdog timer due at `now_ms`
    pub fn tick(&mut self, now_ms: i64) -> Vec<UiEffect> {
        let mut effects = Vec::new();
        for event in self.watchdog.tick(now_ms) {
            effects.extend(self.watchdog_effects(event, now_ms));
        }
        effects
    }

    fn watchdog_effects(&mut self, event: WatchdogEvent, now_ms: i64) -> Vec<UiEffect> {
        match event {
            WatchdogEvent::Ignored => Vec::new(),
            WatchdogEvent::WarningStarted { remaining_secs } => {
                self.swipe.cancel();
                vec![UiEffect::IdleWarning { remaining_secs }]
            }
            WatchdogEvent::Countdown { remaining_secs } => {
                vec![UiEffect::IdleWarning { remaining_secs }]
            }
            WatchdogEvent::ResetRequired => self.reset(now_ms, ResetReason::IdleTimeout),
        }
    }

    // ========== Payment ==========

    fn check_payment(&self) -> KioskResult<()> {
        let step = self.current_step();
        if step != Step::Payment {
            return Err(KioskError::WrongStep {
                expected: Step::Payment,
                actual: step,
            });
        }
        if self.session.cart().is_empty() {
            return Err(KioskError::CartEmpty);
        }
        if self.pending_payment.is_some() {
            return Err(KioskError::PaymentPending);
        }
        Ok(())
    }

    /// Hand the order to payment; at most one attempt in flight
    ///
    /// The caller runs the payment and reports back through
    /// [`Kiosk::finish_payment`] with the returned ticket.
    pub fn begin_payment(&mut self, method: PaymentMethod, form: &PaymentForm) -> Option<PaymentTicket> {
        if let Err(e) = self.check_payment() {
            self.reject(&e);
            return None;
        }
        self.next_ticket += 1;
        let ticket = PaymentTicket {
            epoch: self.session.epoch(),
            id: self.next_ticket,
        };
        self.pending_payment = Some(ticket);
        let total = self.order_summary().rounded().total;
        tracing::info!(?method, ?ticket, %total, has_card = !form.card_number.is_empty(), "Payment started");
        Some(ticket)
    }

    /// Apply a payment result
    ///
    /// Results from an older session or for an unknown ticket are ignored.
    pub fn finish_payment(&mut self, ticket: PaymentTicket, outcome: PaymentOutcome) -> Vec<UiEffect> {
        if ticket.epoch != self.session.epoch() || self.pending_payment != Some(ticket) {
            tracing::debug!(?ticket, "Ignoring stale payment result");
            return Vec::new();
        }
        self.pending_payment = None;

        match outcome {
            PaymentOutcome::Approved => {
                let total = self.order_summary().rounded().total;
                crate::audit_log!(ticket.epoch, "payment", "approved", format!("total={total}"));
                self.session.cart_mut().clear();
                self.notify_key("payment_success", Severity::Success);
                let mut effects = vec![UiEffect::PaymentSucceeded, self.cart_changed()];
                let outcome = self.session.navigator_mut().go_to(Step::Food, true);
                if let Ok(outcome) = outcome {
                    effects.extend(self.nav_effects(outcome));
                }
                effects
            }
            PaymentOutcome::Declined(e) => {
                crate::audit_log!(ticket.epoch, "payment", "declined", e.to_string());
                self.reject(&e);
                vec![UiEffect::PaymentFailed(e)]
            }
        }
    }

    // ========== Session ==========

    fn reset(&mut self, now_ms: i64, reason: ResetReason) -> Vec<UiEffect> {
        let from = self.current_step();
        self.session.reset();
        self.wizard = None;
        self.pending_payment = None;
        self.swipe.cancel();
        self.watchdog.restart(now_ms);

        let epoch = self.session.epoch();
        crate::audit_log!(epoch, "session_reset", reason.as_str());

        let mut effects = vec![UiEffect::SessionReset { epoch, reason }];
        let to = self.current_step();
        if from != to {
            effects.push(UiEffect::StepChanged { from, to });
        }
        effects.push(UiEffect::ScrollToTop);
        effects
    }

    /// Throw the session away and return to the first screen
    pub fn reset_session(&mut self, now_ms: i64) -> Vec<UiEffect> {
        self.reset(now_ms, ResetReason::Explicit)
    }

    /// Current watchdog state, for the idle modal
    pub fn watchdog_state(&self) -> WatchdogState {
        self.watchdog.state()
    }
}
