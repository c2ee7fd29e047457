use crate::Result;
use crate::cli::params::LedgerParams;
use synapse_ledger::scan_stats;

/// UTXO set summary.
#[derive(Debug, Clone, clap::Parser)]
pub struct DumpUtxo {
    /// Number of records listed before the totals.
    #[clap(long, default_value = "100")]
    limit: usize,

    /// Print the summary as JSON.
    #[clap(long)]
    json: bool,

    #[allow(missing_docs)]
    #[clap(flatten)]
    pub ledger_params: LedgerParams,
}

#[derive(Debug, serde::Serialize)]
struct UtxoSummary {
    records: u64,
    malformed: u64,
    foreign: u64,
    unspent_outputs: u64,
    total_amount: u64,
    head: Vec<HeadRecord>,
}

#[derive(Debug, serde::Serialize)]
struct HeadRecord {
    txid: String,
    outputs: usize,
}

impl DumpUtxo {
    pub fn run(self) -> Result<()> {
        let ledger = self.ledger_params.open_read_only()?;
        let stats = scan_stats(&ledger, self.limit)?;

        if self.json {
            let summary = UtxoSummary {
                records: stats.records,
                malformed: stats.malformed,
                foreign: stats.foreign,
                unspent_outputs: stats.unspent_outputs,
                total_amount: stats.total_amount,
                head: stats
                    .head
                    .iter()
                    .map(|(txid, outputs)| HeadRecord {
                        txid: txid.to_string(),
                        outputs: *outputs,
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        for (txid, outputs) in &stats.head {
            println!("{txid} {outputs}");
        }
        println!("records: {}", stats.records);
        println!("unspent outputs: {}", stats.unspent_outputs);
        println!("total amount: {}", stats.total_amount);
        if stats.malformed > 0 || stats.foreign > 0 {
            tracing::warn!(
                "Skipped {} malformed records and {} foreign keys",
                stats.malformed,
                stats.foreign
            );
        }

        Ok(())
    }
}
