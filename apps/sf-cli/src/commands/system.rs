// system.rs - Where the service is reachable on the local network.

use clap::Subcommand;

use super::Context;

#[derive(Subcommand)]
pub enum SystemCommands {
    /// Ask the service for its LAN addresses.
    LocalIp,
    /// Read the static address file written at deploy time.
    IpConfig,
}

pub async fn execute(cmd: &SystemCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        SystemCommands::LocalIp => match ctx.client.local_ip().await {
            Some(info) => {
                println!("Host:    {}", info.hostname);
                println!("Primary: {}", info.primary_ip);
                if info.count > 1 {
                    println!("All ({}): {}", info.count, info.ips.join(", "));
                }
            }
            None => println!("Local address unavailable (is the service running?)."),
        },
        SystemCommands::IpConfig => match ctx.client.ip_config().await {
            Some(config) => {
                println!("Host:    {}", config.hostname);
                println!("Address: http://{}:{}", config.primary_ip, config.port);
                println!("Written: {}", config.timestamp);
            }
            None => println!("No address file found."),
        },
    }
    Ok(())
}
