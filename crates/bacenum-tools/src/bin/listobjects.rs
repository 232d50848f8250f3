use bacenum_client::{BacnetClient, EnumerationSession, NameResolution};
use bacenum_datalink::DataLinkAddress;
use clap::Parser;
use std::fs::File;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// List every object on a BACnet/IP device, with its name.
#[derive(Parser, Debug)]
#[command(name = "listobjects")]
struct Args {
    /// Address of the target device.
    ip: IpAddr,
    /// UDP port of the target device.
    #[arg(default_value_t = DataLinkAddress::BACNET_IP_DEFAULT_PORT)]
    port: u16,
    /// Device instance; skips the directed Who-Is when given.
    #[arg(short = 'd', long = "device")]
    device: Option<u32>,
    /// Local UDP port to bind.
    #[arg(short = 'l', long = "local-port", default_value_t = DataLinkAddress::BACNET_IP_ALTERNATE_PORT)]
    local_port: u16,
    /// Per-request response timeout in seconds.
    #[arg(long, default_value_t = 3)]
    timeout_secs: u64,
    /// Write log output to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Emit the report as JSON.
    #[arg(long)]
    json: bool,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), std::io::Error> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let client = BacnetClient::bind(args.local_port)
        .await?
        .with_response_timeout(Duration::from_secs(args.timeout_secs));
    let addr = DataLinkAddress::Ip((args.ip, args.port).into());

    let mut session = EnumerationSession::new(&client, addr);
    if let Some(instance) = args.device {
        session = session.with_known_instance(instance);
    }

    let result = tokio::select! {
        result = session.run() => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("interrupted");
            std::process::exit(130);
        }
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("enumeration failed: {e}");
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "device {} has {} objects",
            report.device_id,
            report.objects.len()
        );
        for (i, obj) in report.objects.iter().enumerate() {
            match &obj.name {
                NameResolution::Named { name } => {
                    println!("{:>5}. {} \"{name}\"", i + 1, obj.object_id);
                }
                NameResolution::Unavailable { reason } => {
                    println!("{:>5}. {} (name unavailable: {reason})", i + 1, obj.object_id);
                }
            }
        }
    }
    Ok(())
}
