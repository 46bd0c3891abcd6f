// Host tool: unwrap/expect/panic acceptable outside the driver crates.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod run;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use platform::config::{DEFAULT_I2C_ADDR, DRIVER_NAME, DRIVER_VERSION, I2C_DEVICE_ID, OF_COMPATIBLE};
use platform::Channel;

#[derive(Parser)]
#[command(name = "tcsctl")]
#[command(about = "Read a TCS34725 RGBC sensor over Linux I2C", long_about = None)]
#[command(version)]
struct Cli {
    /// I2C character device
    #[arg(long, default_value = "/dev/i2c-1")]
    bus: std::path::PathBuf,
    /// 7-bit device address (decimal or 0x-prefixed hex)
    #[arg(long, default_value_t = DEFAULT_I2C_ADDR, value_parser = parse_address)]
    address: u8,
    /// Use an in-memory simulated sensor instead of real hardware
    #[arg(long)]
    simulate: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set gain, wait for integration, then print status and all channels
    Read {
        /// Gain index: 0=1x, 1=4x, 2=16x, 3=60x
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        gain: i32,
        /// Wait between setting gain and reading, in milliseconds
        #[arg(long, default_value_t = 1200)]
        wait_ms: u32,
    },
    /// Print the AVALID flag
    Status,
    /// Set gain only
    Gain {
        /// Gain index: 0=1x, 1=4x, 2=16x, 3=60x
        #[arg(allow_negative_numbers = true)]
        value: i32,
    },
    /// Read a single channel
    Channel {
        #[arg(value_enum)]
        channel: ChannelArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ChannelArg {
    Clear,
    Red,
    Green,
    Blue,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Clear => Channel::Clear,
            ChannelArg::Red => Channel::Red,
            ChannelArg::Green => Channel::Green,
            ChannelArg::Blue => Channel::Blue,
        }
    }
}

fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    match parsed {
        Ok(addr) if addr <= 0x7F => Ok(addr),
        Ok(addr) => Err(format!("{addr:#04x} is not a 7-bit address")),
        Err(e) => Err(e.to_string()),
    }
}

impl Commands {
    fn into_action(self) -> run::Action {
        match self {
            Commands::Read { gain, wait_ms } => run::Action::Read { gain, wait_ms },
            Commands::Status => run::Action::Status,
            Commands::Gain { value } => run::Action::Gain(value),
            Commands::Channel { channel } => run::Action::Channel(channel.into()),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(
        driver = DRIVER_NAME,
        version = DRIVER_VERSION,
        id = I2C_DEVICE_ID,
        compatible = OF_COMPATIBLE,
        address = cli.address,
        "starting"
    );
    let action = cli.command.into_action();

    let mut out = std::io::stdout().lock();
    if cli.simulate {
        run::simulated(action, &mut out)
    } else {
        run::hardware(&cli.bus, cli.address, action, &mut out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn address_accepts_hex_and_decimal() {
        assert_eq!(parse_address("0x29"), Ok(0x29));
        assert_eq!(parse_address("41"), Ok(0x29));
        assert!(parse_address("0x80").is_err());
        assert!(parse_address("zz").is_err());
    }

    #[test]
    fn defaults_target_the_fixed_address() {
        let cli = Cli::parse_from(["tcsctl", "status"]);
        assert_eq!(cli.address, 0x29);
        assert!(!cli.simulate);
    }

    #[test]
    fn negative_gain_reaches_the_driver() {
        let cli = Cli::parse_from(["tcsctl", "--simulate", "gain", "-1"]);
        assert!(matches!(cli.command, Commands::Gain { value: -1 }));
    }
}
