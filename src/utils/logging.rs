//! Logging helpers
//!
//! Banner and summary lines for the CLI session

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::orchestrator::SessionStats;

/// Start the session log file
///
/// # Arguments
/// - `log_file_path`: log file path
pub fn init_log_file(log_file_path: &Path) -> Result<()> {
    let log_header = format!(
        "{}\nSessão de lançamento mensal - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    std::fs::write(log_file_path, log_header)?;
    Ok(())
}

/// Log the startup banner
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Lançamento mensal - {} - {}", config.utility, config.period);
    info!("📁 Escolas: {}", config.directory_file.display());
    info!("💾 Registros: {}", config.records_file.display());
    info!("{}", "=".repeat(60));
}

/// Log the roster size
pub fn log_roster_loaded(total: usize, start_index: usize) {
    info!("✓ {} schools to process", total);
    if start_index > 0 {
        info!("💡 resuming at school {}", start_index + 1);
    }
}

/// Log the session summary and append it to the log file
///
/// # Arguments
/// - `stats`: session counters
/// - `pending`: pending markers stored for the period, if the count succeeded
/// - `config`: used for the period and log file path
pub fn print_final_stats(stats: &SessionStats, pending: Option<usize>, config: &Config) -> Result<()> {
    let pending = pending
        .map(|p| p.to_string())
        .unwrap_or_else(|| "?".to_string());
    let lines = [
        format!("📊 Resumo {} - {}", config.utility, config.period),
        format!(
            "Concluído em: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!("✅ Salvos: {}", stats.committed),
        format!("⏭️ Pendentes marcados: {}", stats.skipped),
        format!("❌ Falhas ao marcar pendente: {}", stats.skip_failures),
        format!("↩️ Voltas: {}", stats.back_navigations),
        format!("📌 Pendências no período: {}", pending),
    ];

    info!("\n{}", "=".repeat(60));
    for line in &lines {
        info!("{}", line);
    }
    info!("{}", "=".repeat(60));

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.output_log_file)?;
    for line in &lines {
        writeln!(file, "{}", line)?;
    }
    info!("\nLog saved to: {}", config.output_log_file.display());
    Ok(())
}

/// Truncate long text for log display
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
