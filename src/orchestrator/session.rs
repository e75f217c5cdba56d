//! CLI session - orchestration layer
//!
//! ## Responsibilities
//!
//! 1. **Startup**: session log file, banner
//! 2. **Wiring**: file-backed adapters from [`Config`] into a [`Wizard`]
//! 3. **Command loop**: one line from stdin per action, rendered view after each
//! 4. **Teardown**: every wait races Ctrl-C; on Ctrl-C the pending action is
//!    dropped and the wizard dismissed
//! 5. **Summary**: session counters plus the period's pending count

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{JsonKeyValueStore, JsonRecordStore, TomlSchoolDirectory};
use crate::models::CadastroField;
use crate::orchestrator::wizard::{Step, Wizard, WizardState, EMPTY_ROSTER_MESSAGE};
use crate::ports::{KeyValueStore, RecordStore};
use crate::services::{CursorStore, ResolvedState};
use crate::utils::format::format_brl;
use crate::utils::logging::{
    init_log_file, log_roster_loaded, log_startup, print_final_stats, truncate_text,
};

/// User command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    /// `set <n> <field> <value>`, `n` is 1-based
    Set {
        cadastro: usize,
        field: CadastroField,
        value: String,
    },
    Add,
    /// `remove <n>`, `n` is 1-based
    Remove(usize),
    Description(String),
    Notes(String),
    Edit,
    Commit,
    Skip,
    Previous,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line
    ///
    /// # Returns
    /// `Err` with a message for the user when the line is not a command
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "" | "ver" | "show" => Ok(Command::Show),
            "set" | "definir" => {
                let mut parts = rest.splitn(3, char::is_whitespace);
                let cadastro = parse_position(parts.next().unwrap_or_default())?;
                let field_name = parts.next().unwrap_or_default();
                let field = CadastroField::from_str(field_name)
                    .ok_or_else(|| format!("unknown field '{}'", field_name))?;
                let value = parts.next().unwrap_or_default().trim().to_string();
                Ok(Command::Set {
                    cadastro,
                    field,
                    value,
                })
            }
            "add" | "adicionar" => Ok(Command::Add),
            "remove" | "remover" => Ok(Command::Remove(parse_position(rest)?)),
            "desc" | "servico" => Ok(Command::Description(rest.to_string())),
            "notes" | "ocorrencias" => Ok(Command::Notes(rest.to_string())),
            "edit" | "editar" => Ok(Command::Edit),
            "commit" | "salvar" => Ok(Command::Commit),
            "skip" | "pular" => Ok(Command::Skip),
            "prev" | "voltar" => Ok(Command::Previous),
            "help" | "ajuda" | "?" => Ok(Command::Help),
            "quit" | "sair" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}' (type 'help')", other)),
        }
    }
}

/// 1-based position typed by the user → 0-based index
fn parse_position(text: &str) -> Result<usize, String> {
    match text.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{}' is not a cadastro number (1, 2, ...)", text.trim())),
    }
}

const HELP: &str = "\
commands:
  ver                         show the current school
  set <n> <campo> <valor>     fill a field of cadastro n
  add | remove <n>            add / remove a cadastro
  desc <texto>                service description
  notes <texto>               pending occurrences
  editar                      unlock an already filled school
  salvar                      save and go to the next school
  pular                       mark pending and go to the next school
  voltar                      previous school
  sair                        close the wizard
fields: cadastro medidor consumo dias leitura_anterior leitura_atual vencimento valor retencao tipo_instalacao utilizado_por";

/// Application
pub struct App {
    config: Config,
}

impl App {
    /// Initialize the application
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);
        Ok(Self { config })
    }

    /// Run one wizard session over the configured files
    pub async fn run(&self) -> Result<()> {
        let closed = Arc::new(AtomicBool::new(false));
        let closed_flag = closed.clone();

        let mut wizard = Wizard::open(
            TomlSchoolDirectory::new(&self.config.directory_file),
            JsonRecordStore::new(&self.config.records_file),
            CursorStore::new(
                JsonKeyValueStore::new(&self.config.session_file),
                self.config.utility,
            ),
            self.config.period,
            Box::new(move || closed_flag.store(true, Ordering::SeqCst)),
        )
        .await;

        if wizard.state() == WizardState::EmptyRoster {
            if let Some(reason) = wizard.load_error() {
                error!("❌ {}", reason);
            }
            println!("{}", EMPTY_ROSTER_MESSAGE);
            wizard.dismiss();
            return Ok(());
        }

        log_roster_loaded(wizard.roster().len(), wizard.index().unwrap_or(0));
        println!("{}", HELP);

        self.command_loop(&mut wizard).await?;

        if !closed.load(Ordering::SeqCst) {
            wizard.dismiss();
        }

        let pending = match wizard.pending_count().await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!("⚠️ could not count pending schools: {:#}", e);
                None
            }
        };
        print_final_stats(wizard.stats(), pending, &self.config)?;

        Ok(())
    }

    async fn command_loop<R, K>(&self, wizard: &mut Wizard<R, K>) -> Result<()>
    where
        R: RecordStore,
        K: KeyValueStore,
    {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        render(wizard);

        while !wizard.state().is_terminal() {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(line) = line else {
                info!("input closed");
                break;
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            };

            match command {
                Command::Quit => break,
                Command::Help => println!("{}", HELP),
                Command::Show => render(wizard),
                Command::Edit => {
                    wizard.request_edit();
                    render(wizard);
                }
                Command::Commit | Command::Skip | Command::Previous => {
                    let interrupted = tokio::select! {
                        _ = run_action(wizard, &command) => false,
                        _ = tokio::signal::ctrl_c() => true,
                    };
                    if interrupted {
                        warn!("⚠️ interrupted, closing without finishing the current action");
                        break;
                    }
                    render(wizard);
                }
                Command::Set { .. }
                | Command::Add
                | Command::Remove(_)
                | Command::Description(_)
                | Command::Notes(_) => {
                    if !edit_form(wizard, command) {
                        println!("form is read-only: type 'editar' to change a saved school");
                    }
                }
            }
        }

        Ok(())
    }
}

async fn run_action<R, K>(wizard: &mut Wizard<R, K>, command: &Command)
where
    R: RecordStore,
    K: KeyValueStore,
{
    let outcome = match command {
        Command::Commit => wizard.commit().await.map_err(|e| e.to_string()),
        Command::Skip => wizard.skip().await.map_err(|e| e.to_string()),
        Command::Previous => wizard
            .previous()
            .await
            .map(Step::Viewing)
            .map_err(|e| e.to_string()),
        _ => return,
    };

    match outcome {
        Ok(Step::Exhausted) => println!("✅ all schools processed for {}", wizard.period()),
        Ok(Step::Viewing(_)) => {}
        Err(message) => println!("❌ {}", message),
    }
}

/// Apply a form command; `false` when the form refused it
fn edit_form<R, K>(wizard: &mut Wizard<R, K>, command: Command) -> bool
where
    R: RecordStore,
    K: KeyValueStore,
{
    let Some(form) = wizard.form_mut() else {
        return false;
    };
    match command {
        Command::Set {
            cadastro,
            field,
            value,
        } => form.set_field(cadastro, field, value),
        Command::Add => form.add_cadastro(),
        Command::Remove(index) => form.remove_cadastro(index),
        Command::Description(text) => form.set_service_description(text),
        Command::Notes(text) => form.set_pending_notes(text),
        _ => true,
    }
}

/// Print the school on screen and its form
fn render<R, K>(wizard: &Wizard<R, K>)
where
    R: RecordStore,
    K: KeyValueStore,
{
    let (Some(ctx), Some(school)) = (wizard.ctx(), wizard.current_school()) else {
        return;
    };
    let form = wizard.form();

    println!("\n{}", "─".repeat(60));
    println!("{}", ctx);
    if !school.neighborhood.is_empty() || !school.macroregion.is_empty() {
        println!("   {} · {}", school.neighborhood, school.macroregion);
    }
    match wizard.resolved() {
        ResolvedState::Filled(_) if form.is_editable() => println!("   ✏️ editing saved record"),
        ResolvedState::Filled(_) => println!("   🔒 already filled (type 'editar' to change)"),
        ResolvedState::Carried(prior) => println!("   ↪ carried from {}", prior.period),
        ResolvedState::Empty => {}
    }

    for (i, entry) in form.cadastros().iter().enumerate() {
        println!("   cadastro {}:", i + 1);
        for field in CadastroField::ALL {
            let value = entry.field(field);
            if !value.is_empty() {
                println!("     {:<17}{}", field.label(), value);
            }
        }
    }
    if !form.service_description().is_empty() {
        println!("   serviço: {}", truncate_text(form.service_description(), 60));
    }
    if !form.pending_notes().is_empty() {
        println!("   ocorrências: {}", truncate_text(form.pending_notes(), 60));
    }
    println!("   total: {}", format_brl(form.total_value()));
}
