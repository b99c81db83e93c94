use clap::{Parser, Subcommand};
use rusqlite::Connection;
use crate::board::{BoardStore, MoveOutcome, NullSink, PendingTransition, TransitionKind, parse_stage};
use crate::config::Config;
use crate::db::DbConnection;
use crate::models::{Lead, Priority, Stage};
use crate::repo::{ActivityRepo, LeadRepo, SqliteActivitySink};
use crate::cli::parser::{parse_lead_args, join_name, optional_text, stage_not_modifiable, ParsedLeadArgs};
use crate::cli::output::{
    format_activity_list, format_board, format_lead_detail, format_lead_list, format_stage_list,
    format_summary, format_wip_warning, get_terminal_width, is_tty,
};
use crate::cli::error::{user_error, validate_email, validate_lead_id, validate_non_empty};
use crate::filter::{parse_filter, LeadFilter};
use crate::board::filter_leads;
use crate::utils::parse_money;
use crate::cli::abbrev;
use std::io::{self, Write};
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "leadboard")]
#[command(about = "Sales pipeline board: track leads through stages from New to Won")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new lead
    Add {
        /// Lead name, fields and tags (e.g., "Jane Doe company=Acme value=12k +vip")
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List leads
    List {
        /// Filter arguments (e.g., "assignee=maria value>=10k +enterprise")
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show a lead with its stage history
    Show {
        /// Lead ID
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Modify lead fields and tags (use `move` to change stage)
    Modify {
        /// Lead ID
        id: String,
        /// Modification arguments (name words, fields, +tag, -tag)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delete a lead
    Delete {
        /// Lead ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show the pipeline as stage columns
    Board {
        /// Filter arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Move a lead to another stage
    ///
    /// Moving backward or to Lost asks for confirmation.
    Move {
        /// Lead ID
        id: String,
        /// Target stage (new, contacted, qualified, proposal, negotiation, won, lost)
        stage: String,
        /// Reason recorded with a move to Lost
        #[arg(long)]
        reason: Option<String>,
        /// Confirm without prompting
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Pipeline totals per stage
    Summary {
        /// Filter arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List stages with their WIP limits and current load
    Stages {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show stage-change history
    Log {
        /// Lead ID (all leads when omitted)
        id: Option<String>,
        /// Maximum number of entries
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Add a set of demo leads
    Seed {
        /// Skip the confirmation prompt when the board is not empty
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let args = match abbrev::expand_command_abbreviations(args) {
        Ok(expanded) => expanded,
        Err(e) => user_error(&e),
    };

    let clap_args = std::iter::once("leadboard".to_string())
        .chain(args)
        .collect::<Vec<_>>();
    let cli = match Cli::try_parse_from(clap_args) {
        Ok(cli) => cli,
        Err(e) => {
            e.print()?;
            // Help and version go to stdout and are not errors
            if e.use_stderr() {
                std::process::exit(1);
            }
            return Ok(());
        }
    };

    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Add { args } => handle_add(args),
        Commands::List { filter, json } => handle_list(filter, json),
        Commands::Show { id, json } => handle_show(id, json),
        Commands::Modify { id, args } => handle_modify(id, args),
        Commands::Delete { id, yes } => handle_delete(id, yes),
        Commands::Board { filter, json } => handle_board(filter, json),
        Commands::Move { id, stage, reason, yes } => handle_move(id, stage, reason, yes),
        Commands::Summary { filter, json } => handle_summary(filter, json),
        Commands::Stages { json } => handle_stages(json),
        Commands::Log { id, limit, json } => handle_log(id, limit, json),
        Commands::Seed { yes } => handle_seed(yes),
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn open_board() -> Result<(Config, Connection)> {
    let config = Config::load()?;
    let conn = DbConnection::connect(&config)
        .context("Failed to connect to database")?;
    Ok((config, conn))
}

/// `--json` lands among trailing filter tokens; pull it out
fn take_json_flag(tokens: &mut Vec<String>, json: bool) -> bool {
    let before = tokens.len();
    tokens.retain(|t| t != "--json");
    json || tokens.len() != before
}

fn parse_filter_or_exit(tokens: Vec<String>) -> LeadFilter {
    parse_filter(tokens).unwrap_or_else(|e| user_error(&format!("Filter parse error: {}", e)))
}

fn parse_id_or_exit(id: &str) -> i64 {
    validate_lead_id(id).unwrap_or_else(|e| user_error(&e))
}

fn load_lead_or_exit(conn: &Connection, lead_id: i64) -> Result<Lead> {
    match LeadRepo::get_by_id(conn, lead_id).context("Failed to load lead")? {
        Some(lead) => Ok(lead),
        None => user_error(&format!("Lead {} not found", lead_id)),
    }
}

/// Ask a yes/no question on stdout; anything but y/yes is no
fn confirm(question: &str) -> Result<bool> {
    print!("{} (y/n): ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)
        .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

fn prompt_reason() -> Result<Option<String>> {
    print!("Reason (optional): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)
        .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))?;
    let input = input.trim();
    Ok(if input.is_empty() { None } else { Some(input.to_string()) })
}

/// Copy parsed fields (everything but stage) onto `lead`
fn apply_fields(lead: &mut Lead, parsed: &ParsedLeadArgs) -> Result<(), String> {
    if !parsed.name.is_empty() {
        lead.name = join_name(&parsed.name);
    }
    if let Some(email) = &parsed.email {
        let email = optional_text(email);
        if let Some(address) = &email {
            validate_email(address)?;
        }
        lead.email = email;
    }
    if let Some(phone) = &parsed.phone {
        lead.phone = optional_text(phone);
    }
    if let Some(company) = &parsed.company {
        lead.company = optional_text(company);
    }
    if let Some(assignee) = &parsed.assignee {
        lead.assignee = optional_text(assignee);
    }
    if let Some(source) = &parsed.source {
        lead.source = optional_text(source);
    }
    if let Some(value) = &parsed.value {
        lead.value_cents = match optional_text(value) {
            Some(amount) => parse_money(&amount).map_err(|e| e.to_string())?,
            None => 0,
        };
    }
    if let Some(priority) = &parsed.priority {
        lead.priority = Priority::from_str(priority).ok_or_else(|| {
            let levels: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
            format!("Invalid priority '{}'. Expected one of: {}", priority, levels.join(", "))
        })?;
    }

    for tag in &parsed.tags_add {
        if !lead.has_tag(tag) {
            lead.tags.push(tag.clone());
        }
    }
    lead.tags.retain(|t| !parsed.tags_remove.iter().any(|r| r.eq_ignore_ascii_case(t)));
    Ok(())
}

fn handle_add(args: Vec<String>) -> Result<()> {
    let parsed = parse_lead_args(args).unwrap_or_else(|e| user_error(&e.to_string()));
    if let Err(e) = validate_non_empty(&join_name(&parsed.name), "Lead name") {
        user_error(&e);
    }
    if !parsed.tags_remove.is_empty() {
        user_error("Cannot remove tags from a new lead");
    }

    let mut lead = Lead::new(join_name(&parsed.name));
    if let Err(e) = apply_fields(&mut lead, &parsed) {
        user_error(&e);
    }
    if let Some(stage) = &parsed.stage {
        lead.stage = parse_stage(stage).unwrap_or_else(|e| user_error(&e.to_string()));
    }

    let (_config, conn) = open_board()?;
    let created = LeadRepo::create(&conn, &lead)?;
    let id = created.id.context("Created lead has no id")?;
    println!("Created lead {}: {} ({})", id, created.name, created.stage);
    Ok(())
}

fn handle_list(mut filter_args: Vec<String>, json: bool) -> Result<()> {
    let json = take_json_flag(&mut filter_args, json);
    let filter = parse_filter_or_exit(filter_args);

    let (_config, conn) = open_board()?;
    let leads = LeadRepo::list_all(&conn).context("Failed to list leads")?;
    let now = now();
    let matching = filter_leads(&leads, &filter, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&matching)?);
    } else {
        println!("{}", format_lead_list(&matching, now));
    }
    Ok(())
}

fn handle_show(id: String, json: bool) -> Result<()> {
    let lead_id = parse_id_or_exit(&id);
    let (_config, conn) = open_board()?;
    let lead = load_lead_or_exit(&conn, lead_id)?;
    let history = ActivityRepo::list_for_lead(&conn, lead_id)
        .context("Failed to load activity")?;

    if json {
        let value = serde_json::json!({ "lead": lead, "history": history });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", format_lead_detail(&lead, &history, now()));
    }
    Ok(())
}

fn handle_modify(id: String, args: Vec<String>) -> Result<()> {
    let lead_id = parse_id_or_exit(&id);
    let parsed = parse_lead_args(args).unwrap_or_else(|e| user_error(&e.to_string()));
    if parsed.stage.is_some() {
        user_error(&stage_not_modifiable(lead_id).to_string());
    }
    if parsed.is_empty() {
        user_error("No modifications specified");
    }

    let (_config, conn) = open_board()?;
    let mut lead = load_lead_or_exit(&conn, lead_id)?;
    if let Err(e) = apply_fields(&mut lead, &parsed) {
        user_error(&e);
    }

    LeadRepo::update(&conn, &lead)?;
    println!("Modified lead {}: {}", lead_id, lead.name);
    Ok(())
}

fn handle_delete(id: String, yes: bool) -> Result<()> {
    let lead_id = parse_id_or_exit(&id);
    let (_config, conn) = open_board()?;
    let lead = load_lead_or_exit(&conn, lead_id)?;

    if !yes && !confirm(&format!("Delete lead {} ({})?", lead_id, lead.name))? {
        println!("Cancelled.");
        return Ok(());
    }

    LeadRepo::delete(&conn, lead_id)?;
    println!("Deleted lead {}: {}", lead_id, lead.name);
    Ok(())
}

fn handle_board(mut filter_args: Vec<String>, json: bool) -> Result<()> {
    let json = take_json_flag(&mut filter_args, json);
    let filter = parse_filter_or_exit(filter_args);

    let (config, conn) = open_board()?;
    let leads = LeadRepo::list_all(&conn).context("Failed to list leads")?;
    let store = BoardStore::new(leads, config.wip, NullSink);
    let view = store.view(&filter);

    if json {
        let columns: Vec<serde_json::Value> = view
            .columns
            .iter()
            .map(|c| {
                serde_json::json!({
                    "stage": c.stage,
                    "label": c.stage.label(),
                    "wip_limit": c.wip_limit,
                    "load": c.load,
                    "over_limit": c.is_over_limit(),
                    "value_cents": c.value_cents,
                    "leads": c.leads,
                })
            })
            .collect();
        let value = serde_json::json!({ "columns": columns, "summary": view.summary });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", format_board(&view, get_terminal_width(), is_tty()));
    }
    Ok(())
}

fn describe_pending(pending: &PendingTransition, lead: &Lead) -> String {
    format!("Lead {} ({}): {}", pending.lead_id(), lead.name, pending.prompt())
}

fn handle_move(id: String, stage: String, reason: Option<String>, yes: bool) -> Result<()> {
    let lead_id = parse_id_or_exit(&id);
    let (config, conn) = open_board()?;
    let leads = LeadRepo::list_all(&conn).context("Failed to list leads")?;

    // The audit entry and the stage update commit together
    let tx = conn.unchecked_transaction()?;
    let mut store = BoardStore::new(leads, config.wip, SqliteActivitySink::new(&tx));

    let outcome = store
        .move_stage_named(lead_id, &stage, reason.clone())
        .unwrap_or_else(|e| user_error(&e.to_string()));

    let entry = match outcome {
        MoveOutcome::Applied(entry) => entry,
        MoveOutcome::NeedsConfirmation(pending) => {
            let lead = store.get(lead_id).context("Lead vanished from board")?;
            let question = describe_pending(&pending, lead);
            if !yes && !confirm(&question)? {
                store.cancel();
                println!("Cancelled. Lead {} stays in {}.", lead_id, pending.from());
                return Ok(());
            }
            if pending.kind() == TransitionKind::Lost && reason.is_none() && !yes {
                store.set_pending_reason(prompt_reason()?);
            }
            match store.confirm()? {
                Some(entry) => entry,
                None => return Ok(()),
            }
        }
        MoveOutcome::Ignored => return Ok(()),
    };

    LeadRepo::update_stage(&tx, lead_id, entry.to_stage, entry.timestamp)?;

    let target = entry.to_stage;
    let load = store.load(target);
    let limit = store.limits().get(target);
    drop(store);
    tx.commit().context("Failed to save stage change")?;

    if entry.from_stage == entry.to_stage {
        println!("Lead {} is already in {}; activity refreshed.", lead_id, target);
    } else {
        println!("Moved lead {} from {} to {}.", lead_id, entry.from_stage, target);
    }
    if let Some(reason) = &entry.reason {
        println!("Reason: {}", reason);
    }
    if let Some(limit) = limit.filter(|limit| load > *limit) {
        eprintln!("{}", format_wip_warning(target, load, limit));
    }
    Ok(())
}

fn handle_summary(mut filter_args: Vec<String>, json: bool) -> Result<()> {
    let json = take_json_flag(&mut filter_args, json);
    let filter = parse_filter_or_exit(filter_args);

    let (config, conn) = open_board()?;
    let leads = LeadRepo::list_all(&conn).context("Failed to list leads")?;
    let store = BoardStore::new(leads, config.wip, NullSink);
    let view = store.view(&filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&view.summary)?);
    } else {
        print!("{}", format_summary(&view.summary));
    }
    Ok(())
}

fn handle_stages(json: bool) -> Result<()> {
    let (config, conn) = open_board()?;
    let leads = LeadRepo::list_all(&conn).context("Failed to list leads")?;
    let store = BoardStore::new(leads, config.wip, NullSink);
    let loads: Vec<(Stage, usize)> = Stage::ALL.iter().map(|s| (*s, store.load(*s))).collect();

    if json {
        let stages: Vec<serde_json::Value> = loads
            .iter()
            .map(|(stage, load)| {
                serde_json::json!({
                    "stage": stage,
                    "label": stage.label(),
                    "order": stage.index(),
                    "terminal": stage.is_terminal(),
                    "wip_limit": store.limits().get(*stage),
                    "load": load,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&stages)?);
    } else {
        print!("{}", format_stage_list(store.limits(), &loads));
    }
    Ok(())
}

fn handle_log(id: Option<String>, limit: usize, json: bool) -> Result<()> {
    let (_config, conn) = open_board()?;
    let entries = match id {
        Some(id) => {
            let lead_id = parse_id_or_exit(&id);
            let mut history = ActivityRepo::list_for_lead(&conn, lead_id)?;
            // Keep the newest `limit` entries, still oldest first
            let skip = history.len().saturating_sub(limit);
            history.drain(..skip);
            history
        }
        None => ActivityRepo::list_recent(&conn, limit)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", format_activity_list(&entries));
    }
    Ok(())
}

fn handle_seed(yes: bool) -> Result<()> {
    let (_config, conn) = open_board()?;
    let existing = LeadRepo::count(&conn)?;
    if existing > 0
        && !yes
        && !confirm(&format!("Board already has {} lead(s). Add demo leads anyway?", existing))?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let added = crate::seed::seed(&conn, now())?;
    println!("Added {} demo leads.", added);
    Ok(())
}
