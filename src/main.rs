use std::time::Duration;

use vectorlink::cli::{CliArgs, HELP};
use vectorlink::producer::feed_commands;
use vectorlink::{init_logging, list_ports, PointLog, SerialTransmitter, Sketcher};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::from_env()?;
    if args.help {
        print!("{}", HELP);
        return Ok(());
    }
    if args.version {
        println!("vectorlink {} ({})", vectorlink::VERSION, vectorlink::BUILD_DATE);
        return Ok(());
    }

    init_logging()?;

    if args.list_ports {
        for port in list_ports()? {
            println!("{}\t{}", port.port_name, port.description);
        }
        return Ok(());
    }

    let config = args.load_config()?;
    let log = PointLog::new();

    // The transmitter owns the port on its own thread; this thread is the producer.
    let handle = SerialTransmitter::open(
        &config.connection_params(),
        log.clone(),
        config.transmitter_config(),
    )?
    .spawn()?;

    let mut sketcher = Sketcher::new(log.clone(), config.sketch.snap_size)?;
    let summary = feed_commands(std::io::stdin().lock(), &mut sketcher, || {
        !handle.is_finished()
    });
    tracing::debug!("Sketch input done: {:?}", summary);

    while !handle.is_finished() {
        if args.exit_when_drained && handle.cursor() >= log.len() {
            handle.shutdown();
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    let report = handle.join();
    tracing::info!(
        "Transmitter {}: {} sent, {} rejected",
        report.status.state,
        report.status.points_sent,
        report.status.points_rejected
    );
    match report.error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
