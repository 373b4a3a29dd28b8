//! Report rendering
//!
//! Turns the structured [`ReportRecord`] into the run artifacts: a text
//! research report, a CSV export of the trade ledger, and a JSON dump of
//! the full record. The pipeline itself never touches the filesystem -
//! all I/O lives here.

use std::fs;
use std::path::Path;

use kairos_backtest::ReportRecord;

use crate::error::Result;
use crate::session::SessionStats;

/// Render the text research report
pub fn render_text_report(report: &ReportRecord, stats: &SessionStats) -> String {
    let timeframe = match (report.first_trade_at, report.last_trade_at) {
        (Some(first), Some(last)) => format!("{} - {}", first.to_rfc3339(), last.to_rfc3339()),
        _ => "N/A".to_string(),
    };
    let outcome = if report.pnl.is_sign_negative() {
        "loss"
    } else {
        "profit"
    };

    format!(
        "\n==================== RESEARCH REPORT ====================\n\
         Strategy: Orderbook Delta Momentum\n\
         Symbol: {symbol}\n\
         Timeframe: {timeframe}\n\
         Iterations: {iterations}\n\
         Data quality: {skipped} skipped ticks, {out_of_order} out-of-order snapshots, {crossed} crossed books\n\
         ---------------------------------------------------------\n\
         Performance Metrics:\n\
         Initial Balance: ${initial}\n\
         Final Balance:   ${balance}\n\
         Position:        {position}\n\
         Position Value:  ${position_value}\n\
         Total Value:     ${total_value}\n\
         PNL:             ${pnl} ({pnl_pct}%)\n\
         Total Trades:    {trades}\n\
         ---------------------------------------------------------\n\
         Conclusion: the orderbook delta momentum strategy showed a\n\
         {outcome} of ${abs_pnl} over {iterations} iterations.\n\
         =========================================================\n",
        symbol = report.symbol,
        timeframe = timeframe,
        iterations = stats.iterations,
        skipped = report.skipped_ticks,
        out_of_order = stats.out_of_order_skips,
        crossed = stats.crossed_books,
        initial = report.initial_balance.round_dp(2),
        balance = report.final_balance.round_dp(2),
        position = report.final_position,
        position_value = report.position_value.round_dp(2),
        total_value = report.total_value.round_dp(2),
        pnl = report.pnl.round_dp(2),
        pnl_pct = report.pnl_pct.round_dp(4),
        trades = report.trade_count,
        outcome = outcome,
        abs_pnl = report.pnl.abs().round_dp(2),
    )
}

/// Render the trade ledger as CSV
pub fn render_trades_csv(report: &ReportRecord) -> String {
    let mut out = String::from("timestamp,signal,price,quantity,position,realized_pnl,delta\n");
    for trade in &report.trades {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            trade.timestamp.to_rfc3339(),
            trade.signal.as_str(),
            trade.price,
            trade.quantity,
            trade.position,
            trade.realized_pnl,
            trade.delta,
        ));
    }
    out
}

/// Write the run artifacts into `dir`
///
/// Produces `research_report.txt`, `trades.csv` (only when the ledger is
/// non-empty, matching the original tool), and `report.json`.
pub fn write_artifacts(dir: impl AsRef<Path>, report: &ReportRecord, stats: &SessionStats) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let text = render_text_report(report, stats);
    fs::write(dir.join("research_report.txt"), &text)?;

    if report.trades.is_empty() {
        log::info!("No trades to export");
    } else {
        fs::write(dir.join("trades.csv"), render_trades_csv(report))?;
        log::info!("Exported {} trades to trades.csv", report.trade_count);
    }

    fs::write(
        dir.join("report.json"),
        serde_json::to_string_pretty(report)?,
    )?;

    log::info!("Artifacts written to {}", dir.display());
    Ok(())
}
