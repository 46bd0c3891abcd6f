use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::delay::DelayNs;
use platform::mocks::SimulatedTransport;
use platform::tcs34725::{REG_STATUS, STATUS_AVALID};
use platform::{Channel, RegisterTransport, RgbcReading};
use tcs34725::{Command, CommandId, Response, SensorDevice, SensorError};

type Device<T, D> = SensorDevice<NoopRawMutex, T, D>;

/// What the user asked for, independent of the bus behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read { gain: i32, wait_ms: u32 },
    Status,
    Gain(i32),
    Channel(Channel),
}

/// Channel values the simulated sensor reports.
const SIMULATED_READING: RgbcReading = RgbcReading {
    clear: 1180,
    red: 412,
    green: 331,
    blue: 256,
};

pub fn simulated(action: Action, out: &mut impl Write) -> Result<()> {
    run_simulated(simulated_bus(), action, out)
}

/// Simulated sensor with a completed integration and a fixed reading.
fn simulated_bus() -> SimulatedTransport {
    let bus = SimulatedTransport::new();
    for channel in Channel::ALL {
        bus.set_channel(channel, SIMULATED_READING.get(channel));
    }
    bus.set_register(REG_STATUS, STATUS_AVALID);
    bus
}

fn run_simulated(bus: SimulatedTransport, action: Action, out: &mut impl Write) -> Result<()> {
    let device = attach(bus.clone(), bus.delay())?;
    execute(&device, action, &mut bus.delay(), out)
}

#[cfg(target_os = "linux")]
pub fn hardware(path: &Path, address: u8, action: Action, out: &mut impl Write) -> Result<()> {
    use linux_embedded_hal::{Delay, I2cdev};
    use platform::tcs34725::COMMAND_BIT;
    use platform::I2cRegisterTransport;

    let i2c = I2cdev::new(path).with_context(|| format!("opening {}", path.display()))?;
    let transport = I2cRegisterTransport::new(i2c, address, COMMAND_BIT);
    tracing::debug!(path = %path.display(), address = transport.address(), "opened I2C bus");
    let device = attach(transport, Delay)?;
    execute(&device, action, &mut Delay, out)
}

#[cfg(not(target_os = "linux"))]
pub fn hardware(path: &Path, _address: u8, _action: Action, _out: &mut impl Write) -> Result<()> {
    anyhow::bail!(
        "{}: I2C character devices need Linux; use --simulate",
        path.display()
    )
}

fn attach<T, D>(transport: T, delay: D) -> Result<Device<T, D>>
where
    T: RegisterTransport,
    T::Error: Send + Sync + 'static,
    D: DelayNs,
{
    Device::attach(transport, delay)
        .map_err(|(e, _, _)| e)
        .context("initialising TCS34725")
}

fn ioctl_out<T, D>(device: &Device<T, D>, id: CommandId) -> Result<i32, SensorError<T::Error>>
where
    T: RegisterTransport,
    D: DelayNs,
{
    let mut buf = [0u8; 4];
    device.ioctl(id.raw(), Some(&mut buf))?;
    Ok(i32::from_ne_bytes(buf))
}

fn execute<T, D>(
    device: &Device<T, D>,
    action: Action,
    wait: &mut impl DelayNs,
    out: &mut impl Write,
) -> Result<()>
where
    T: RegisterTransport,
    T::Error: Send + Sync + 'static,
    D: DelayNs,
{
    match action {
        Action::Read { gain, wait_ms } => {
            // Same ioctl sequence a device-node client issues. A failed step
            // is reported and the remaining steps still run.
            let mut failures = 0u32;

            let mut payload = gain.to_ne_bytes();
            match device.ioctl(CommandId::SetGain.raw(), Some(&mut payload)) {
                Ok(()) => wait.delay_ms(wait_ms),
                Err(e) => {
                    tracing::error!(error = %e, gain, "failed to set gain");
                    failures = failures.saturating_add(1);
                }
            }

            match ioctl_out(device, CommandId::ReadStatus) {
                Ok(0) => writeln!(out, "Data is not valid.")?,
                Ok(_) => writeln!(out, "Data is valid!")?,
                Err(e) => {
                    tracing::error!(error = %e, "failed to read status");
                    failures = failures.saturating_add(1);
                }
            }

            let mut reading = RgbcReading::default();
            let mut complete = true;
            for (id, channel) in [
                (CommandId::ReadRed, Channel::Red),
                (CommandId::ReadGreen, Channel::Green),
                (CommandId::ReadBlue, Channel::Blue),
                (CommandId::ReadClear, Channel::Clear),
            ] {
                let sample = ioctl_out(device, id)
                    .map_err(anyhow::Error::from)
                    .and_then(|v| u16::try_from(v).with_context(|| format!("sample {v} out of range")));
                match sample {
                    Ok(value) => {
                        writeln!(out, "{}: {value}", channel.name())?;
                        reading.set(channel, value);
                    }
                    Err(e) => {
                        tracing::error!(error = %format!("{e:#}"), channel = channel.name(), "failed to read channel");
                        failures = failures.saturating_add(1);
                        complete = false;
                    }
                }
            }

            // Only judge colour from a full set of samples
            if complete {
                writeln!(out, "-> Dominant Color: {}", reading.dominant())?;
            }
            if failures > 0 {
                anyhow::bail!("{failures} of 6 sensor commands failed");
            }
        }
        Action::Status => {
            let ready = match device.execute(Command::ReadStatus).context("reading status")? {
                Response::Ready(ready) => ready,
                other => anyhow::bail!("unexpected response {other:?}"),
            };
            writeln!(out, "{}", if ready { "valid" } else { "not valid" })?;
        }
        Action::Gain(value) => {
            device
                .execute(Command::SetGain(value))
                .with_context(|| format!("setting gain {value}"))?;
            writeln!(out, "gain set to {value}")?;
        }
        Action::Channel(channel) => {
            let value = device.read_channel(channel).with_context(|| format!("reading {}", channel.name()))?;
            writeln!(out, "{}: {value}", channel.name())?;
        }
    }
    Ok(())
}
