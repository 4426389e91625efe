//! Receiver-side demo driver.
//!
//! Listens for a committer, runs the Pedersen pre-processing, then for each
//! iteration receives a commitment and its decommitment and verifies a
//! Diffie-Hellman proof over the same channel. Task timings are written as
//! a JSON report on exit.

use clap::Parser;
use tracing::{info, warn};

use sigma_pedersen::channel::Channel;
use sigma_pedersen::{
    DlogGroup, Measurement, PedersenReceiver, Result, SecureRng, SigmaBiMessage,
    SigmaDhCommonInput, SigmaDhMessage, SigmaDhVerifier, TcpChannel, ZpGroup,
};

#[derive(Parser)]
#[command(name = "receiver")]
#[command(about = "Pedersen receiver and sigma-DH verifier", long_about = None)]
struct Cli {
    /// Address to listen on for the committer.
    #[arg(long, default_value = "127.0.0.1:7300")]
    address: String,

    /// Number of commit/decommit/proof iterations.
    #[arg(long, default_value_t = 3)]
    iterations: usize,

    /// Soundness parameter of the sigma protocol, in bits.
    #[arg(long, default_value_t = 80)]
    soundness: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut measurement = Measurement::with_task_names(
        "CmtPedersenReceiver",
        cli.iterations,
        vec![
            cli.address.clone(),
            cli.iterations.to_string(),
            cli.soundness.to_string(),
        ],
        vec![
            "receive_commitment".to_string(),
            "receive_decommitment".to_string(),
            "dh_verify".to_string(),
        ],
    );

    let group = ZpGroup::rfc5114_2048_256();
    info!(address = %cli.address, "waiting for committer");
    let channel = TcpChannel::accept(&cli.address)?;

    let mut receiver = PedersenReceiver::new(group.clone(), Some(channel), SecureRng::new())?;
    receiver.preprocess()?;
    let h = receiver
        .preprocessed_values()
        .expect("preprocess has just run")
        .clone();

    for iteration in 0..cli.iterations {
        measurement.start_sub_task("receive_commitment", iteration);
        let output = receiver.receive_commitment()?;
        measurement.end_sub_task("receive_commitment", iteration);

        measurement.start_sub_task("receive_decommitment", iteration);
        let value = receiver.receive_decommitment(output.id())?;
        measurement.end_sub_task("receive_decommitment", iteration);
        match value {
            Some(value) => info!(id = output.id(), ?value, "decommitment accepted"),
            None => warn!(id = output.id(), "decommitment rejected"),
        }

        measurement.start_sub_task("dh_verify", iteration);
        let accepted = run_verify_round(&group, &h, cli.soundness, receiver.channel_mut())?;
        measurement.end_sub_task("dh_verify", iteration);
        if accepted {
            info!(iteration, "proof accepted");
        } else {
            warn!(iteration, "proof rejected");
        }
    }

    measurement.finish()?;
    Ok(())
}

/// Verifies one proof round: reads (u, v) and the first message, sends a
/// fresh challenge, reads the response and decides.
fn run_verify_round<C: Channel>(
    group: &ZpGroup,
    h: &<ZpGroup as DlogGroup>::Element,
    soundness: u32,
    channel: &mut C,
) -> Result<bool> {
    let u = group.reconstruct_element(false, &channel.read_with_size()?)?;
    let v = group.reconstruct_element(false, &channel.read_with_size()?)?;
    let common = SigmaDhCommonInput::new(h.clone(), u, v);

    let first = SigmaDhMessage::from_bytes(&channel.read_with_size()?)?;

    let mut verifier = SigmaDhVerifier::new(group.clone(), soundness, SecureRng::new())?;
    let challenge = verifier.sample_challenge();
    channel.write_with_size(&challenge)?;

    let second = SigmaBiMessage::from_bytes(&channel.read_with_size()?);
    verifier.verify(&common, &first, &second)
}
