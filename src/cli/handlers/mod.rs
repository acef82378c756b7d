mod resolve;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::store::DirStore;
use crate::model::config::AppConfig;
use crate::model::task::TaskDraft;
use crate::ops::coordinator::Coordinator;
use crate::ops::view::{self, StatusFilter, TaskFilter};

use resolve::{Resolved, resolve_tab, resolve_task};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a command needs: the restored collection, config and today's date
struct Context {
    coordinator: Coordinator<DirStore>,
    config: AppConfig,
    today: NaiveDate,
}

impl Context {
    fn open(data_dir: PathBuf, config: AppConfig) -> Self {
        tracing::debug!(dir = %data_dir.display(), key = %config.storage.key, "opening store");
        let coordinator = Coordinator::open_with_key(DirStore::new(data_dir), &config.storage.key);
        Context {
            coordinator,
            config,
            today: Local::now().date_naive(),
        }
    }

    /// Resolve a tab argument, defaulting to the active tab. `None` means the
    /// reference matched nothing (already reported).
    fn tab_or_active(&self, query: Option<&str>) -> Result<Option<String>, String> {
        let state = self.coordinator.state();
        match query {
            None => Ok(Some(state.active_tab_id().to_string())),
            Some(q) => Ok(found(resolve_tab(state, q)?, "tab", q)),
        }
    }

    fn task(&self, query: &str) -> Result<Option<(String, String)>, String> {
        Ok(found(resolve_task(self.coordinator.state(), query)?, "task", query))
    }
}

fn found<T>(resolved: Resolved<T>, what: &str, query: &str) -> Option<T> {
    match resolved {
        Resolved::Found(v) => Some(v),
        Resolved::Missing => {
            eprintln!("warning: no {} matching '{}', nothing changed", what, query);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let data_dir = config_io::data_dir(cli.data_dir.as_deref().map(Path::new));
    let config = config_io::read_config(&data_dir)?;
    let mut ctx = Context::open(data_dir, config);

    match cli.command {
        Commands::Tabs => cmd_tabs(&ctx, json),
        Commands::Tab(cmd) => match cmd.action {
            TabAction::Add(args) => cmd_tab_add(&mut ctx, args),
            TabAction::Rm(args) => cmd_tab_rm(&mut ctx, args),
            TabAction::Use(args) => cmd_tab_use(&mut ctx, args),
        },
        Commands::Add(args) => cmd_add(&mut ctx, args),
        Commands::Edit(args) => cmd_edit(&mut ctx, args),
        Commands::Rm(args) => cmd_rm(&mut ctx, args),
        Commands::Toggle(args) => cmd_toggle(&mut ctx, args),
        Commands::Cycle(args) => cmd_cycle(&mut ctx, args),
        Commands::List(args) => cmd_list(&ctx, args, json),
        Commands::Show(args) => cmd_show(&ctx, args, json),
    }
}

// ---------------------------------------------------------------------------
// Tab handlers
// ---------------------------------------------------------------------------

fn cmd_tabs(ctx: &Context, json: bool) -> CmdResult {
    let state = ctx.coordinator.state();
    let active = state.active_tab_id();
    if json {
        let tabs: Vec<TabJson> = state
            .tabs
            .iter()
            .map(|tab| tab_to_json(tab, tab.id() == active, view::tab_stats(tab, ctx.today)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&tabs)?);
    } else {
        for tab in &state.tabs {
            let stats = view::tab_stats(tab, ctx.today);
            println!("{}", format_tab_line(tab, tab.id() == active, &stats));
        }
    }
    Ok(())
}

fn cmd_tab_add(ctx: &mut Context, args: TabAddArgs) -> CmdResult {
    let id = ctx.coordinator.add_tab(&args.name)?;
    if args.activate {
        ctx.coordinator.set_active_tab(&id)?;
    }
    println!("{}", id);
    Ok(())
}

fn cmd_tab_rm(ctx: &mut Context, args: TabRefArg) -> CmdResult {
    let Some(tab_id) = ctx.tab_or_active(Some(args.tab.as_str()))? else {
        return Ok(());
    };
    let name = ctx
        .coordinator
        .state()
        .find_tab(&tab_id)
        .map(|t| t.name.clone())
        .unwrap_or_default();
    if ctx.coordinator.remove_tab(&tab_id)? {
        println!("Removed tab {}", name);
    } else {
        eprintln!("warning: the {} tab cannot be removed", name);
    }
    Ok(())
}

fn cmd_tab_use(ctx: &mut Context, args: TabRefArg) -> CmdResult {
    let Some(tab_id) = ctx.tab_or_active(Some(args.tab.as_str()))? else {
        return Ok(());
    };
    ctx.coordinator.set_active_tab(&tab_id)?;
    if let Some(tab) = ctx.coordinator.state().active_tab() {
        println!("Active tab: {}", tab.name);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task handlers
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &mut Context, args: AddArgs) -> CmdResult {
    let Some(tab_id) = ctx.tab_or_active(args.tab.as_deref())? else {
        return Ok(());
    };
    let draft = TaskDraft {
        name: args.name,
        due_date: args.due,
        description: args.desc,
        priority: args.priority.unwrap_or(ctx.config.tasks.default_priority),
    };
    if let Some(id) = ctx.coordinator.add_task(&tab_id, draft)? {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_edit(ctx: &mut Context, args: EditArgs) -> CmdResult {
    let Some((tab_id, task_id)) = ctx.task(&args.id)? else {
        return Ok(());
    };
    let Some(task) = ctx
        .coordinator
        .state()
        .find_tab(&tab_id)
        .and_then(|tab| tab.find_task(&task_id))
    else {
        return Ok(());
    };

    let mut draft = task.to_draft();
    if let Some(name) = args.name {
        draft.name = name;
    }
    if args.no_due {
        draft.due_date = None;
    } else if let Some(due) = args.due {
        draft.due_date = Some(due);
    }
    if let Some(desc) = args.desc {
        draft.description = desc;
    }
    if let Some(priority) = args.priority {
        draft.priority = priority;
    }

    if ctx.coordinator.edit_task(&task_id, draft)? {
        println!("{}", task_id);
    }
    Ok(())
}

fn cmd_rm(ctx: &mut Context, args: TaskIdArg) -> CmdResult {
    let Some((tab_id, task_id)) = ctx.task(&args.id)? else {
        return Ok(());
    };
    let name = task_name(ctx, &task_id);
    if ctx.coordinator.remove_task(&tab_id, &task_id)? {
        println!("Removed {}", name);
    }
    Ok(())
}

fn cmd_toggle(ctx: &mut Context, args: TaskIdArg) -> CmdResult {
    let Some((tab_id, task_id)) = ctx.task(&args.id)? else {
        return Ok(());
    };
    if ctx.coordinator.toggle_task_completed(&tab_id, &task_id)?
        && let Some((_, task)) = ctx.coordinator.state().find_task(&task_id)
    {
        let status = if task.completed { "completed" } else { "pending" };
        println!("{}: {}", task.name, status);
    }
    Ok(())
}

fn cmd_cycle(ctx: &mut Context, args: TaskIdArg) -> CmdResult {
    let Some((tab_id, task_id)) = ctx.task(&args.id)? else {
        return Ok(());
    };
    if ctx.coordinator.cycle_task_priority(&tab_id, &task_id)?
        && let Some((_, task)) = ctx.coordinator.state().find_task(&task_id)
    {
        println!("{}: {}", task.name, task.priority);
    }
    Ok(())
}

fn task_name(ctx: &Context, task_id: &str) -> String {
    ctx.coordinator
        .state()
        .find_task(task_id)
        .map(|(_, t)| t.name.clone())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs, json: bool) -> CmdResult {
    let Some(tab_id) = ctx.tab_or_active(args.tab.as_deref())? else {
        return Ok(());
    };
    let state = ctx.coordinator.state();
    let Some(tab) = state.find_tab(&tab_id) else {
        return Ok(());
    };
    let status = match args.status {
        Some(status) => status,
        None => ctx
            .config
            .list
            .default_status
            .parse::<StatusFilter>()
            .map_err(|e| format!("config list.default_status: {}", e))?,
    };
    let filter = TaskFilter {
        search: args.search,
        priority: args.priority.unwrap_or_default(),
        status,
    };
    let projection = view::project_tab(tab, &filter);

    if json {
        let out = TaskListJson {
            tab: tab_to_json(tab, tab.id() == state.active_tab_id(), view::tab_stats(tab, ctx.today)),
            tasks: projection
                .tasks()
                .iter()
                .map(|t| task_to_json(t, ctx.today))
                .collect(),
            empty: projection.empty_reason(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_listing(tab, &projection, ctx.today) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: TaskIdArg, json: bool) -> CmdResult {
    let Some((_, task_id)) = ctx.task(&args.id)? else {
        return Ok(());
    };
    let Some((tab, task)) = ctx.coordinator.state().find_task(&task_id) else {
        return Ok(());
    };
    if json {
        let out = TaskDetailJson {
            tab: tab.id().to_string(),
            task: task_to_json(task, ctx.today),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_task_detail(task, tab, ctx.today) {
            println!("{}", line);
        }
    }
    Ok(())
}
