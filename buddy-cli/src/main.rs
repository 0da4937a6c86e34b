use anyhow::{Context, Result, bail};
use buddy_core::time::{local_date, parse_date};
use buddy_core::{
    AchievementKind, BudgetState, Category, Confirmation, LoginOutcome, NewGoal, NewTransaction, TransactionType,
    categorize,
};
use buddy_ingest::{NotificationInbox, NotificationParser};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod annotate;
mod config;
mod setup;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "buddy", version, about = "Budget Buddy: expense tracking with a plant that grows with your habits")]
struct Cli {
    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive setup: write ~/.budget-buddy/config.toml
    Setup,

    /// Record today's visit (streak + plant)
    Login,

    /// Add a transaction by hand
    Add {
        /// Amount, e.g. 1,250.00
        amount: String,

        description: String,

        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionType,

        /// Category label; guessed from the description when omitted
        #[arg(long)]
        category: Option<String>,

        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Bank notification (SMS) commands
    Sms {
        #[command(subcommand)]
        command: SmsCommand,
    },

    /// Savings goals
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Monthly budget
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Most recent transactions
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Achievements and progress toward each
    Achievements,

    /// Balance, month to date, streak, and plant
    Status,
}

#[derive(Subcommand, Debug)]
enum SmsCommand {
    /// Parse one message without storing anything
    Parse { text: String },

    /// Queue messages (one per line) for review
    Scan {
        #[arg(long)]
        file: PathBuf,
    },

    /// Show queued messages awaiting a decision
    List,

    /// Turn a queued message into a transaction
    Confirm { id: String },

    /// Drop a queued message
    Reject { id: String },
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    Add {
        title: String,

        target: f64,

        /// YYYY-MM-DD, after today
        #[arg(long)]
        deadline: String,

        #[arg(long, default_value = "Savings")]
        category: String,
    },

    /// Set the amount saved so far
    Progress { id: String, amount: f64 },

    List,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    Set { amount: f64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let home = state::ensure_buddy_home()?;
    debug!(home = %home.display(), "Using data directory");

    if let Command::Setup = cli.command {
        return setup::run_setup(&home);
    }

    let cfg = config::load_config(&home)?;
    let today = local_date(Utc::now(), &cfg.general.timezone)?;
    let mut budget = state::load_state(&home, cfg.budget.default_monthly)?;

    match cli.command {
        Command::Setup => {}

        Command::Login => {
            let report = budget.record_login(today, Utc::now());
            match report.outcome {
                LoginOutcome::AlreadyRecorded => println!("Already checked in today."),
                LoginOutcome::Started => println!("Welcome! Streak started."),
                LoginOutcome::Advanced => println!("Streak: {} days", report.current_streak),
            }
            print_unlocked(&budget, &report.unlocked);
            print_plant(&budget);
            state::save_state(&home, &budget)?;
        }

        Command::Add {
            amount,
            description,
            kind,
            category,
            date,
        } => {
            let category = match category {
                Some(label) => Category::from_label(&label).with_context(|| {
                    format!(
                        "unknown category {label:?} (one of: {})",
                        Category::ALL.map(|c| c.label()).join(", ")
                    )
                })?,
                None => categorize(&description),
            };
            let date = date.as_deref().map(parse_date).transpose()?.unwrap_or(today);
            let txn = NewTransaction::from_input(&amount, &description, category, kind, date)?;

            let confirmation = budget.confirm_transaction(txn, Utc::now());
            state::save_state(&home, &budget)?;
            report_confirmation(&budget, &confirmation, today);
            advise(&home, &cfg, &mut budget, &confirmation).await?;
        }

        Command::Sms { command } => {
            let parser = NotificationParser::new(cfg.notification_capability())?;
            let mut inbox = state::load_inbox(&home)?;
            sms(command, &home, &cfg, &parser, &mut inbox, &mut budget, today).await?;
        }

        Command::Goal { command } => match command {
            GoalCommand::Add {
                title,
                target,
                deadline,
                category,
            } => {
                let deadline = parse_date(&deadline)?;
                let goal = budget.add_goal(NewGoal::new(title, target, deadline, category, today)?);
                println!("Added goal {} ({}): ${:.2} by {}", goal.title, goal.id, goal.target_amount, goal.deadline);
                state::save_state(&home, &budget)?;
            }
            GoalCommand::Progress { id, amount } => {
                let goal = budget.update_goal_progress(&id, amount)?;
                println!(
                    "{}: ${:.2} of ${:.2} ({:.0}%){}",
                    goal.title,
                    goal.current_amount,
                    goal.target_amount,
                    goal.progress_pct(),
                    if goal.is_completed { " - completed!" } else { "" }
                );
                state::save_state(&home, &budget)?;
            }
            GoalCommand::List => {
                if budget.goals.is_empty() {
                    println!("No goals yet. Add one: buddy goal add \"Emergency fund\" 1000 --deadline YYYY-MM-DD");
                }
                for g in &budget.goals {
                    let days = g.days_until_deadline(today);
                    println!(
                        "{} | {} [{}] | ${:.2}/${:.2} ({:.0}%) | {} | {}",
                        g.id,
                        g.title,
                        g.category,
                        g.current_amount,
                        g.target_amount,
                        g.progress_pct(),
                        g.deadline,
                        if g.is_completed {
                            "done".to_string()
                        } else if days < 0 {
                            format!("{} days overdue", -days)
                        } else {
                            format!("{days} days left")
                        }
                    );
                }
            }
        },

        Command::Budget { command } => match command {
            BudgetCommand::Set { amount } => {
                budget.set_monthly_budget(amount)?;
                println!("Monthly budget: ${:.2}", budget.monthly_budget);
                state::save_state(&home, &budget)?;
            }
        },

        Command::History { limit } => {
            let recent = budget.ledger().recent(limit);
            if recent.is_empty() {
                println!("No transactions yet.");
            }
            for t in recent {
                println!(
                    "{} | {} | {:>10} | {} | {}",
                    t.date,
                    t.kind,
                    format!("{:.2}", t.signed_amount()),
                    t.category,
                    t.description
                );
                if let Some(advice) = &t.advice {
                    println!("    tip: {advice}");
                }
            }
        }

        Command::Achievements => {
            let streak = f64::from(budget.login_streak.current_streak);
            let balance = budget.current_balance();
            let expenses = budget.ledger().expense_count() as f64;
            for a in &budget.achievements {
                let metric = match a.kind {
                    AchievementKind::LoginStreak => streak,
                    AchievementKind::Savings => balance,
                    AchievementKind::Spending => expenses,
                };
                println!(
                    "{} {} {:<24} {:>3.0}%  {}",
                    if a.is_unlocked { "[x]" } else { "[ ]" },
                    a.icon,
                    a.title,
                    a.progress_pct(metric),
                    a.description
                );
            }
        }

        Command::Status => print_status(&budget, today),
    }

    Ok(())
}

async fn sms(
    command: SmsCommand,
    home: &Path,
    cfg: &Config,
    parser: &NotificationParser,
    inbox: &mut NotificationInbox,
    budget: &mut BudgetState,
    today: NaiveDate,
) -> Result<()> {
    if !parser.capability().is_available() {
        println!("Notification reading is disabled on this host (notifications.enabled = false).");
    }

    match command {
        SmsCommand::Parse { text } => match parser.parse(&text, today) {
            Some(d) => println!(
                "{} ${:.2} | {} | {} | {}",
                d.kind, d.amount, d.category, d.description, d.date
            ),
            None => println!("No transaction detected"),
        },

        SmsCommand::Scan { file } => {
            let text = fs::read_to_string(&file).with_context(|| format!("read {}", file.display()))?;
            let before = inbox.len();
            let detected = inbox.scan(parser, text.lines(), today);
            println!(
                "Queued {} messages, {} with a transaction. Review with: buddy sms list",
                inbox.len() - before,
                detected
            );
            state::save_inbox(home, inbox)?;
        }

        SmsCommand::List => {
            let mut any = false;
            for p in inbox.pending() {
                any = true;
                match &p.draft {
                    Some(d) => println!(
                        "{} | {} ${:.2} | {} | {}",
                        p.id, d.kind, d.amount, d.category, d.description
                    ),
                    None => println!("{} | No transaction detected | {}", p.id, p.content),
                }
            }
            if !any {
                println!("Nothing to review.");
            }
        }

        SmsCommand::Confirm { id } => {
            let txn = inbox.confirm(&id)?;
            let confirmation = budget.confirm_transaction(txn, Utc::now());
            state::save_state(home, budget)?;
            state::save_inbox(home, inbox)?;
            report_confirmation(budget, &confirmation, today);
            advise(home, cfg, budget, &confirmation).await?;
        }

        SmsCommand::Reject { id } => match inbox.reject(&id) {
            Some(p) => {
                println!("Dropped: {}", p.content);
                state::save_inbox(home, inbox)?;
            }
            None => bail!("no queued message with id {id}"),
        },
    }

    Ok(())
}

async fn advise(home: &Path, cfg: &Config, budget: &mut BudgetState, confirmation: &Confirmation) -> Result<()> {
    let advisor = cfg.advisor();
    let events = annotate::annotate(&advisor, budget, std::slice::from_ref(&confirmation.transaction_id)).await;
    for ev in &events {
        println!("\nTip: {}", ev.advice);
    }
    if !events.is_empty() {
        state::save_state(home, budget)?;
    }
    Ok(())
}

fn report_confirmation(budget: &BudgetState, confirmation: &Confirmation, today: NaiveDate) {
    if let Some(t) = budget.ledger().get(&confirmation.transaction_id) {
        println!(
            "Added {} ${:.2} | {} | {} ({})",
            t.kind, t.amount, t.category, t.description, t.id
        );
        if t.kind == TransactionType::Expense {
            println!(
                "Spent this month: ${:.2} of ${:.2}",
                budget.monthly_spending(today),
                budget.monthly_budget
            );
        }
    }
    if let Some(habit) = confirmation.habit {
        println!("Habit: {}", habit.describe());
    }
    print_unlocked(budget, &confirmation.unlocked);
    print_plant(budget);
}

fn print_unlocked(budget: &BudgetState, ids: &[String]) {
    for id in ids {
        if let Some(a) = budget.achievements.iter().find(|a| &a.id == id) {
            println!("Achievement unlocked: {} {} - {}", a.icon, a.title, a.description);
        }
    }
}

fn print_plant(budget: &BudgetState) {
    let plant = &budget.plant_health;
    println!(
        "Plant: {} ({}/100) - {}",
        plant.stage().title(),
        plant.level(),
        plant.message()
    );
}

fn print_status(budget: &BudgetState, today: NaiveDate) {
    let spent = budget.monthly_spending(today);
    println!("Balance:         ${:.2}", budget.current_balance());
    println!("Income (month):  ${:.2}", budget.monthly_income(today));
    println!("Spent (month):   ${:.2} of ${:.2}", spent, budget.monthly_budget);
    if spent > budget.monthly_budget {
        println!("                 over budget by ${:.2}", spent - budget.monthly_budget);
    }

    let streak = &budget.login_streak;
    println!(
        "Streak:          {} days (best {}, {} visits{})",
        streak.current_streak,
        streak.longest_streak,
        streak.total_logins,
        if streak.has_logged_in(today) { "" } else { ", not yet today" }
    );

    print_plant(budget);
    println!(
        "Habits:          {} good / {} bad",
        budget.plant_health.good_habits(),
        budget.plant_health.bad_habits()
    );

    let unlocked = budget.achievements.iter().filter(|a| a.is_unlocked).count();
    println!("Achievements:    {unlocked}/{}", budget.achievements.len());
    let open = budget.goals.iter().filter(|g| !g.is_completed).count();
    println!("Goals:           {open} open, {} done", budget.goals.len() - open);
}
