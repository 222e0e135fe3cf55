//! Backdoor framework - firmware server and control client
//!
//! With no subcommand the program becomes the server. In another shell:
//!
//! ```text
//! $ backdoor-framework send nop
//! $ backdoor-framework send set voltage 100
//! $ backdoor-framework send exit
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use bdf_core::Firmware;
use bdf_firmware::{
    client, FirmwareConfig, ReportFormat, Reporter, Result, Server, DEFAULT_SOCKET_PATH,
    SOCKET_ENV,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "backdoor-framework",
    version,
    about = "Simulated firmware with an undocumented control socket"
)]
struct Cli {
    /// Control socket path
    #[arg(long, global = true, env = SOCKET_ENV, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the firmware server (default)
    Serve {
        /// Interrupt report format on stdout
        #[arg(long, value_enum, default_value_t = ReportArg::Text)]
        report: ReportArg,
    },
    /// Send one command: nop | exit | set VARIABLE VALUE | OPCODE [ARG...]
    Send {
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        tokens: Vec<String>,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug)]
#[clap(rename_all = "lower")]
enum ReportArg {
    Text,
    Json,
}

impl From<ReportArg> for ReportFormat {
    fn from(value: ReportArg) -> Self {
        match value {
            ReportArg::Text => ReportFormat::Text,
            ReportArg::Json => ReportFormat::Json,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => serve(FirmwareConfig {
            socket_path: cli.socket,
            ..FirmwareConfig::default()
        })
        .await,
        Some(Commands::Serve { report }) => {
            serve(FirmwareConfig {
                socket_path: cli.socket,
                report_format: report.into(),
            })
            .await
        }
        Some(Commands::Send { tokens }) => {
            let bytes = client::encode_args(&tokens)?;
            client::send(&cli.socket, &bytes).await
        }
    }
}

async fn serve(config: FirmwareConfig) -> Result<()> {
    let server = Server::bind(&config)?;
    let mut firmware = Firmware::new();
    let mut reporter = Reporter::stdout(config.report_format);
    server.run(&mut firmware, &mut reporter).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdf_firmware::FirmwareError;
    use clap::error::ErrorKind;

    #[test]
    fn test_no_subcommand_serves() {
        let cli = Cli::try_parse_from(["backdoor-framework"]).unwrap();
        assert!(cli.command.is_none());
        if std::env::var_os(SOCKET_ENV).is_none() {
            assert_eq!(cli.socket, PathBuf::from(DEFAULT_SOCKET_PATH));
        }
    }

    #[test]
    fn test_serve_report_format() {
        let cli = Cli::try_parse_from(["backdoor-framework", "serve", "--report", "json"]).unwrap();
        let Some(Commands::Serve { report }) = cli.command else {
            panic!("expected serve, got {:?}", cli.command);
        };
        assert_eq!(ReportFormat::from(report), ReportFormat::Json);

        let cli = Cli::try_parse_from(["backdoor-framework", "serve"]).unwrap();
        let Some(Commands::Serve { report }) = cli.command else {
            panic!("expected serve, got {:?}", cli.command);
        };
        assert_eq!(ReportFormat::from(report), ReportFormat::Text);

        assert!(Cli::try_parse_from(["backdoor-framework", "serve", "--report", "xml"]).is_err());
    }

    #[test]
    fn test_socket_is_global() {
        for argv in [
            ["backdoor-framework", "--socket", "/tmp/bdf", "send", "nop"],
            ["backdoor-framework", "send", "nop", "--socket", "/tmp/bdf"],
        ] {
            let cli = Cli::try_parse_from(argv).unwrap();
            assert_eq!(cli.socket, PathBuf::from("/tmp/bdf"));
            assert!(matches!(cli.command, Some(Commands::Send { ref tokens }) if tokens == &["nop"]));
        }
    }

    #[test]
    fn test_send_requires_tokens() {
        let err = Cli::try_parse_from(["backdoor-framework", "send"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_negative_value_reaches_client() {
        let cli = Cli::try_parse_from(["backdoor-framework", "send", "set", "voltage", "-1"]).unwrap();
        let Some(Commands::Send { tokens }) = cli.command else {
            panic!("expected send, got {:?}", cli.command);
        };
        assert_eq!(tokens, ["set", "voltage", "-1"]);
        assert!(matches!(
            client::encode_args(&tokens),
            Err(FirmwareError::InvalidToken { ref token, reason: "not a number" }) if token == "-1"
        ));
    }
}
