//! 终端运行时 - 单任务事件循环
//!
//! 一个 tokio 任务独占 [`Kiosk`]，按顺序处理：
//!
//! - 命令 (`mpsc`)，每条命令处理完才读下一条
//! - 看门狗定时器 (`sleep_until` 下一个截止时间)
//! - 支付结果 (后台任务通过 channel 回报，带 session epoch)
//! - 关闭信号 (`CancellationToken`)
//!
//! 所有 [`UiEffect`] 通过 `broadcast` 发布给界面层。

use super::config::Config;
use super::kiosk::{Collaborators, Kiosk, PaymentTicket, UiEffect};
use crate::services::PaymentProcessor;
use crate::watchdog::WatchdogState;
use serde::Serialize;
use shared::models::{GridDensity, Locale, OrderType, Step};
use shared::order::{
    CartLine, LineId, OrderSummary, PaymentForm, PaymentMethod, PaymentOutcome,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const COMMAND_BUFFER: usize = 64;
const EFFECT_BUFFER: usize = 256;

/// 运行时错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Kiosk runtime has stopped")]
    Closed,
}

/// 界面层发来的命令
#[derive(Debug)]
pub enum KioskCommand {
    SelectLanguage(Locale),
    ChooseOrderType(OrderType),
    BackToWelcome,
    ChangeLocale(Locale),
    ToggleTheme,
    ToggleViewMode,
    SetGridDensity(GridDensity),
    QuickAdd(i64),
    OpenWizard(i64),
    EditLine(LineId),
    WizardSelect { group: String, choice: String },
    WizardSetQuantity(i32),
    WizardSetNote(String),
    WizardNext,
    WizardPrevious,
    CommitWizard,
    CloseWizard,
    UpdateQuantity { line_id: LineId, quantity: i32 },
    RemoveLine(LineId),
    ClearCart,
    GoTo(Step),
    NextStep,
    PreviousStep,
    PointerDown(f64),
    PointerMove(f64),
    PointerUp,
    PointerCancel,
    StillHere,
    StartOver,
    ResetSession,
    Pay { method: PaymentMethod, form: PaymentForm },
    Snapshot(oneshot::Sender<KioskSnapshot>),
}

impl KioskCommand {
    /// Whether the command counts as visitor activity for the watchdog
    fn is_activity(&self) -> bool {
        !matches!(
            self,
            KioskCommand::Snapshot(_) | KioskCommand::StillHere | KioskCommand::StartOver
        )
    }
}

/// 只读状态快照
#[derive(Debug, Clone, Serialize)]
pub struct KioskSnapshot {
    pub step: Step,
    pub epoch: u64,
    pub lines: Vec<CartLine>,
    pub summary: OrderSummary,
    pub watchdog: WatchdogState,
    pub wizard_open: bool,
    pub pending_payment: Option<PaymentTicket>,
}

impl KioskSnapshot {
    fn of(kiosk: &Kiosk) -> Self {
        Self {
            step: kiosk.current_step(),
            epoch: kiosk.session().epoch(),
            lines: kiosk.cart().lines().to_vec(),
            summary: kiosk.order_summary(),
            watchdog: kiosk.watchdog_state(),
            wizard_open: kiosk.wizard().is_some(),
            pending_payment: kiosk.pending_payment(),
        }
    }
}

/// 运行时句柄 (可克隆)
#[derive(Clone)]
pub struct KioskHandle {
    commands: mpsc::Sender<KioskCommand>,
    effects: broadcast::Sender<UiEffect>,
    shutdown: CancellationToken,
}

impl KioskHandle {
    pub async fn send(&self, command: KioskCommand) -> Result<(), RuntimeError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RuntimeError::Closed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEffect> {
        self.effects.subscribe()
    }

    pub async fn snapshot(&self) -> Result<KioskSnapshot, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(KioskCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| RuntimeError::Closed)
    }

    /// 发送关闭信号
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Milliseconds since the runtime started, following tokio's clock
#[derive(Debug, Clone, Copy)]
struct Clock {
    start: Instant,
}

impl Clock {
    fn now_ms(&self) -> i64 {
        i64::try_from(self.start.elapsed().as_millis()).unwrap_or(i64::MAX)
    }

    /// `None` when the deadline lies beyond what the clock can represent
    fn instant_at(&self, ms: i64) -> Option<Instant> {
        let offset = Duration::from_millis(u64::try_from(ms).unwrap_or(0));
        self.start.checked_add(offset)
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

pub struct KioskRuntime {
    kiosk: Kiosk,
    clock: Clock,
    processor: Arc<dyn PaymentProcessor>,
    effects: broadcast::Sender<UiEffect>,
    payment_tx: mpsc::Sender<(PaymentTicket, PaymentOutcome)>,
    shutdown: CancellationToken,
}

impl KioskRuntime {
    /// Start the event loop on the current tokio runtime
    pub fn spawn(
        config: Config,
        collaborators: Collaborators,
        processor: Arc<dyn PaymentProcessor>,
    ) -> (KioskHandle, JoinHandle<()>) {
        let clock = Clock {
            start: Instant::now(),
        };
        let kiosk = Kiosk::new(config, collaborators, clock.now_ms());

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (payment_tx, payment_rx) = mpsc::channel(COMMAND_BUFFER);
        let (effects, _) = broadcast::channel(EFFECT_BUFFER);
        let shutdown = CancellationToken::new();

        let runtime = Self {
            kiosk,
            clock,
            processor,
            effects: effects.clone(),
            payment_tx,
            shutdown: shutdown.clone(),
        };
        let join = tokio::spawn(runtime.run(command_rx, payment_rx));

        let handle = KioskHandle {
            commands: command_tx,
            effects,
            shutdown,
        };
        (handle, join)
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<KioskCommand>,
        mut payments: mpsc::Receiver<(PaymentTicket, PaymentOutcome)>,
    ) {
        tracing::info!(step = %self.kiosk.current_step(), "Kiosk runtime started");
        let shutdown = self.shutdown.clone();

        loop {
            let armed = self.kiosk.watchdog().armed();
            let deadline = armed.and_then(|t| self.clock.instant_at(t.deadline_ms));

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                command = commands.recv() => match command {
                    Some(command) => self.apply(command),
                    None => break,
                },
                Some((ticket, outcome)) = payments.recv() => {
                    let effects = self.kiosk.finish_payment(ticket, outcome);
                    self.publish(effects);
                }
                _ = sleep_until_deadline(deadline) => {
                    if let Some(timer) = armed {
                        let effects = self.kiosk.on_timer(timer.token, self.clock.now_ms());
                        self.publish(effects);
                    }
                }
            }
        }

        tracing::info!("Kiosk runtime stopped");
    }

    fn publish(&self, effects: Vec<UiEffect>) {
        for effect in effects {
            // no subscriber is not an error
            let _ = self.effects.send(effect);
        }
    }

    fn apply(&mut self, command: KioskCommand) {
        let now = self.clock.now_ms();
        if command.is_activity() {
            self.kiosk.register_activity(now);
        }

        let k = &mut self.kiosk;
        let effects = match command {
            KioskCommand::SelectLanguage(locale) => k.select_language(locale),
            KioskCommand::ChooseOrderType(order_type) => k.choose_order_type(order_type),
            KioskCommand::BackToWelcome => k.back_to_welcome(),
            KioskCommand::ChangeLocale(locale) => k.change_locale(locale),
            KioskCommand::ToggleTheme => k.toggle_theme(),
            KioskCommand::ToggleViewMode => k.toggle_view_mode(),
            KioskCommand::SetGridDensity(density) => k.set_grid_density(density),
            KioskCommand::QuickAdd(item_id) => k.quick_add(item_id),
            KioskCommand::OpenWizard(item_id) => k.open_wizard(item_id),
            KioskCommand::EditLine(line_id) => k.edit_line(line_id),
            KioskCommand::WizardSelect { group, choice } => {
                k.wizard_select(&group, &choice);
                Vec::new()
            }
            KioskCommand::WizardSetQuantity(quantity) => {
                if let Some(w) = k.wizard_mut() {
                    w.set_quantity(quantity);
                }
                Vec::new()
            }
            KioskCommand::WizardSetNote(note) => {
                if let Some(w) = k.wizard_mut() {
                    w.set_note(&note);
                }
                Vec::new()
            }
            KioskCommand::WizardNext => {
                k.wizard_next();
                Vec::new()
            }
            KioskCommand::WizardPrevious => {
                k.wizard_previous();
                Vec::new()
            }
            KioskCommand::CommitWizard => k.commit_wizard(),
            KioskCommand::CloseWizard => k.close_wizard(),
            KioskCommand::UpdateQuantity { line_id, quantity } => {
                k.update_quantity(line_id, quantity)
            }
            KioskCommand::RemoveLine(line_id) => k.remove_line(line_id),
            KioskCommand::ClearCart => k.clear_cart(),
            KioskCommand::GoTo(step) => k.go_to(step),
            KioskCommand::NextStep => k.next_step(),
            KioskCommand::PreviousStep => k.previous_step(),
            KioskCommand::PointerDown(x) => {
                k.pointer_down(x, now);
                Vec::new()
            }
            KioskCommand::PointerMove(x) => {
                k.pointer_move(x);
                Vec::new()
            }
            KioskCommand::PointerUp => k.pointer_up(now),
            KioskCommand::PointerCancel => {
                k.pointer_cancel();
                Vec::new()
            }
            KioskCommand::StillHere => k.still_here(now),
            KioskCommand::StartOver => k.start_over(now),
            KioskCommand::ResetSession => k.reset_session(now),
            KioskCommand::Pay { method, form } => match k.begin_payment(method, &form) {
                Some(ticket) => {
                    self.start_payment(ticket, method, form);
                    vec![UiEffect::PaymentStarted(ticket)]
                }
                None => Vec::new(),
            },
            KioskCommand::Snapshot(reply) => {
                let _ = reply.send(KioskSnapshot::of(k));
                Vec::new()
            }
        };
        self.publish(effects);
    }

    fn start_payment(&self, ticket: PaymentTicket, method: PaymentMethod, form: PaymentForm) {
        let processor = self.processor.clone();
        let results = self.payment_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                outcome = processor.submit(method, form) => {
                    if results.send((ticket, outcome)).await.is_err() {
                        tracing::debug!(?ticket, "Runtime gone before payment finished");
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MemoryNotifier, SimulatedPayment};
    use crate::watchdog::WatchdogConfig;

    fn spawn_menu_runtime() -> (KioskHandle, JoinHandle<()>) {
        let config = Config {
            skip_intro: true,
            ..Config::default()
        };
        let collaborators =
            Collaborators::default().with_notifier(Arc::new(MemoryNotifier::new()));
        KioskRuntime::spawn(
            config,
            collaborators,
            Arc::new(SimulatedPayment::new(Duration::from_millis(2_000))),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_are_applied_in_order() {
        let (handle, _join) = spawn_menu_runtime();
        handle.send(KioskCommand::QuickAdd(1)).await.unwrap();
        handle.send(KioskCommand::QuickAdd(4)).await.unwrap();
        handle.send(KioskCommand::GoTo(Step::Review)).await.unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.step, Step::Review);
        assert_eq!(snapshot.lines.len(), 2);
        assert_eq!(snapshot.summary.item_count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_maps_milliseconds_to_instants() {
        let clock = Clock {
            start: Instant::now(),
        };
        assert_eq!(clock.instant_at(-5), Some(clock.start));
        assert_eq!(
            clock.instant_at(1_500),
            Some(clock.start + Duration::from_millis(1_500))
        );
        // far deadlines must not panic
        let _ = clock.instant_at(i64::MAX);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(clock.now_ms(), 2_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_timeouts_do_not_crash_the_loop() {
        let config = Config {
            skip_intro: true,
            watchdog: WatchdogConfig {
                idle_timeout_ms: i64::MAX,
                warning_timeout_ms: i64::MAX,
            },
            ..Config::default()
        };
        let collaborators =
            Collaborators::default().with_notifier(Arc::new(MemoryNotifier::new()));
        let (handle, _join) = KioskRuntime::spawn(
            config,
            collaborators,
            Arc::new(SimulatedPayment::new(Duration::from_millis(2_000))),
        );

        handle.send(KioskCommand::QuickAdd(1)).await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.watchdog, WatchdogState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_the_loop() {
        let (handle, join) = spawn_menu_runtime();
        handle.shutdown();
        join.await.unwrap();
        assert_eq!(
            handle.send(KioskCommand::NextStep).await,
            Err(RuntimeError::Closed)
        );
    }
}
