use anyhow::Context;
use clap::{Parser, Subcommand};
use kiosk_core::services::SimulatedPayment;
use kiosk_core::{Collaborators, Config, KioskCommand, KioskRuntime, UiEffect, print_banner};
use shared::models::{Locale, OrderType, Step};
use shared::order::{PaymentForm, PaymentMethod};
use std::sync::Arc;
use std::time::Duration;

/// Scripted kiosk session against the configured (or built-in) menu
#[derive(Parser, Debug)]
#[command(name = "kiosk-core", version)]
struct Cli {
    /// Start directly on the menu
    #[arg(long, env = "KIOSK_SKIP_INTRO")]
    skip_intro: Option<bool>,
    /// Idle timeout override (ms)
    #[arg(long)]
    idle_timeout_ms: Option<i64>,
    /// Warning countdown override (ms)
    #[arg(long)]
    warning_timeout_ms: Option<i64>,
    #[command(subcommand)]
    command: Option<Scenario>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Scenario {
    /// Order, customize and pay
    Order,
    /// Walk away and let the idle watchdog reset the session
    Idle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env().context("invalid kiosk configuration")?;
    if let Some(skip) = cli.skip_intro {
        config.skip_intro = skip;
    }
    if let Some(ms) = cli.idle_timeout_ms {
        config.watchdog.idle_timeout_ms = ms;
    }
    if let Some(ms) = cli.warning_timeout_ms {
        config.watchdog.warning_timeout_ms = ms;
    }
    config.validate().context("invalid kiosk configuration")?;

    kiosk_core::init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;
    print_banner();

    // 2. 启动运行时
    let collaborators = Collaborators::from_config(&config)?;
    let processor = Arc::new(SimulatedPayment::new(Duration::from_millis(
        config.payment_delay_ms,
    )));
    let intro = config.intro_enabled();
    let (handle, join) = KioskRuntime::spawn(config, collaborators, processor);

    let mut effects = handle.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(effect) = effects.recv().await {
            println!("  → {effect:?}");
        }
    });

    // 3. 运行脚本
    let send = |command| {
        let handle = handle.clone();
        async move {
            println!("{command:?}");
            handle.send(command).await
        }
    };

    if intro {
        send(KioskCommand::SelectLanguage(Locale::En)).await?;
        send(KioskCommand::ChooseOrderType(OrderType::DineIn)).await?;
    }

    match cli.command.unwrap_or(Scenario::Order) {
        Scenario::Order => {
            send(KioskCommand::QuickAdd(4)).await?;
            send(KioskCommand::OpenWizard(3)).await?;
            send(KioskCommand::WizardNext).await?;
            send(KioskCommand::WizardSelect {
                group: "Doneness".into(),
                choice: "Medium".into(),
            })
            .await?;
            send(KioskCommand::WizardSelect {
                group: "Extras".into(),
                choice: "Cheese".into(),
            })
            .await?;
            send(KioskCommand::WizardNext).await?;
            send(KioskCommand::WizardSetNote("no onions".into())).await?;
            send(KioskCommand::WizardNext).await?;
            send(KioskCommand::CommitWizard).await?;
            send(KioskCommand::GoTo(Step::Drinks)).await?;
            send(KioskCommand::QuickAdd(10)).await?;
            send(KioskCommand::GoTo(Step::Payment)).await?;

            let snapshot = handle.snapshot().await?;
            println!(
                "cart: {} lines, total {}",
                snapshot.lines.len(),
                kiosk_core::orders::format_price(snapshot.summary.total)
            );

            send(KioskCommand::Pay {
                method: PaymentMethod::Card,
                form: PaymentForm {
                    card_number: "4242 4242 4242 4242".into(),
                    cardholder_name: "Demo Visitor".into(),
                    expiry_date: "12/99".into(),
                    cvv: "123".into(),
                },
            })
            .await?;
            let mut results = handle.subscribe();
            while let Ok(effect) = results.recv().await {
                if matches!(effect, UiEffect::PaymentSucceeded | UiEffect::PaymentFailed(_)) {
                    break;
                }
            }
        }
        Scenario::Idle => {
            send(KioskCommand::QuickAdd(1)).await?;
            let mut results = handle.subscribe();
            while let Ok(effect) = results.recv().await {
                if matches!(effect, UiEffect::SessionReset { .. }) {
                    break;
                }
            }
        }
    }

    let snapshot = handle.snapshot().await?;
    println!(
        "final: step={} epoch={} lines={}",
        snapshot.step,
        snapshot.epoch,
        snapshot.lines.len()
    );

    handle.shutdown();
    join.await?;
    printer.abort();
    Ok(())
}
