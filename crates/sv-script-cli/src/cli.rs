use bitcoin::consensus::encode::{FromHexError, deserialize_hex};
use bitcoin::{Amount, Script, Transaction};
use std::sync::Arc;
use sv_script::{
    CallbackDebugger, Engine, ExecutionParams, NoSignatureCheck, ParsedScript, SignatureChecker,
    TransactionSignatureChecker, VerifyFlags,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {what} hex: {source}")]
    InvalidHex {
        what: &'static str,
        source: hex::FromHexError,
    },
    #[error("unknown verification flag: {0}")]
    UnknownFlag(String),
    #[error("invalid transaction: {0}")]
    InvalidTransaction(#[from] FromHexError),
    #[error("--input-index and --amount require --tx")]
    MissingTransaction,
    #[error(transparent)]
    Script(#[from] sv_script::Error),
}

#[derive(Debug, clap::Parser)]
#[command(version, about = "Bitcoin SV script interpreter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter, in the `RUST_LOG` syntax.
    #[arg(long, global = true, default_value = "info")]
    pub log: String,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Verify an unlocking script against a locking script.
    Run(Run),

    /// Print the human-readable form of a raw script.
    Disasm {
        #[arg(index = 1)]
        script: String,
    },
}

#[derive(Debug, clap::Args)]
pub struct Run {
    /// Hex encoded unlocking script.
    #[arg(long, default_value = "")]
    unlocking: String,

    /// Hex encoded locking script.
    #[arg(long)]
    locking: String,

    /// Comma separated verification flags, e.g. `P2SH,STRICTENC`.
    #[arg(long, default_value = "")]
    flags: String,

    /// Spend an output created after the genesis upgrade.
    #[arg(long)]
    after_genesis: bool,

    /// Hex encoded spending transaction. Signatures always pass without it.
    #[arg(long)]
    tx: Option<String>,

    /// Index of the input being verified.
    #[arg(long)]
    input_index: Option<usize>,

    /// Value of the spent output in satoshis.
    #[arg(long)]
    amount: Option<u64>,

    /// Print every executed opcode along with the data stack.
    #[arg(long)]
    trace: bool,
}

fn decode_hex(what: &'static str, input: &str) -> Result<Vec<u8>, Error> {
    let input = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(input).map_err(|source| Error::InvalidHex { what, source })
}

/// Parses a comma separated list of flag names.
fn parse_flags(input: &str) -> Result<VerifyFlags, Error> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .try_fold(VerifyFlags::NONE, |flags, name| {
            let flag = VerifyFlags::from_name(&name.to_ascii_uppercase())
                .ok_or_else(|| Error::UnknownFlag(name.to_string()))?;
            Ok(flags | flag)
        })
}

fn trace_debugger() -> CallbackDebugger {
    CallbackDebugger::new()
        .on_after_execute_opcode(|state| {
            if let Some(op) = state.opcode() {
                let stack = state
                    .data_stack
                    .iter()
                    .map(|item| {
                        if item.is_empty() {
                            "<empty>".to_string()
                        } else {
                            hex::encode(item)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "{}:{:<4} {:<24} [{stack}]",
                    state.script_idx,
                    state.script_off,
                    op.to_string()
                );
            }
        })
        .on_after_script_change(|state| println!("-- script #{}", state.script_idx))
}

impl Run {
    pub fn run(self) -> Result<(), Error> {
        let unlocking = decode_hex("unlocking script", &self.unlocking)?;
        let locking = decode_hex("locking script", &self.locking)?;

        let mut flags = parse_flags(&self.flags)?;
        if self.after_genesis {
            flags |= VerifyFlags::UTXO_AFTER_GENESIS;
        }

        let tx = self
            .tx
            .as_deref()
            .map(deserialize_hex::<Transaction>)
            .transpose()?;

        let tx_checker;
        let checker: &dyn SignatureChecker = match &tx {
            Some(tx) => {
                let amount = Amount::from_sat(self.amount.unwrap_or_default());
                tx_checker =
                    TransactionSignatureChecker::new(tx, self.input_index.unwrap_or_default(), amount);
                &tx_checker
            }
            None if self.input_index.is_some() || self.amount.is_some() => {
                return Err(Error::MissingTransaction);
            }
            None => &NoSignatureCheck,
        };

        let mut engine = Engine::new();
        if self.trace {
            engine = engine.with_debugger(Arc::new(trace_debugger()));
        }

        tracing::debug!("Verifying with flags {flags:?}");

        engine.execute(ExecutionParams {
            unlocking_script: Script::from_bytes(&unlocking),
            locking_script: Script::from_bytes(&locking),
            flags,
            checker,
        })?;

        Ok(())
    }
}

impl Command {
    pub fn run(self) -> Result<(), Error> {
        match self {
            Self::Run(run) => {
                run.run()?;
                println!("OK");
            }
            Self::Disasm { script } => {
                let script = decode_hex("script", &script)?;
                println!("{}", ParsedScript::parse(&script)?);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        assert_eq!(parse_flags("").unwrap(), VerifyFlags::NONE);
        assert_eq!(
            parse_flags("p2sh, STRICTENC,").unwrap(),
            VerifyFlags::P2SH | VerifyFlags::STRICTENC
        );
        assert_eq!(parse_flags("STANDARD").unwrap(), VerifyFlags::STANDARD);
        assert!(matches!(
            parse_flags("P2SH,SEGWIT"),
            Err(Error::UnknownFlag(flag)) if flag == "SEGWIT"
        ));
    }

    #[test]
    fn test_run() {
        let run = |unlocking: &str, locking: &str, flags: &str| Run {
            unlocking: unlocking.to_string(),
            locking: locking.to_string(),
            flags: flags.to_string(),
            after_genesis: false,
            tx: None,
            input_index: None,
            amount: None,
            trace: false,
        };

        assert!(run("5456", "5253958852529387", "").run().is_ok());
        assert!(matches!(
            run("5457", "5253958852529387", "").run(),
            Err(Error::Script(sv_script::Error::EqualVerify))
        ));
        assert!(matches!(
            run("0x54", "zz", "").run(),
            Err(Error::InvalidHex { what: "locking script", .. })
        ));

        let mut missing_tx = run("51", "51", "");
        missing_tx.amount = Some(1);
        assert!(matches!(missing_tx.run(), Err(Error::MissingTransaction)));
    }
}
