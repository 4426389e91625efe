//! Committer-side demo driver.
//!
//! Connects to a listening receiver, runs the Pedersen pre-processing,
//! then for each iteration commits to the configured value, decommits, and
//! proves knowledge of a Diffie-Hellman tuple over the same channel. Task
//! timings are written as a JSON report on exit.

use clap::Parser;
use num_bigint::BigUint;
use tracing::info;

use sigma_pedersen::channel::Channel;
use sigma_pedersen::{
    CommitValue, DlogGroup, Measurement, PedersenCommitter, Result, SecureRng, SigmaDhCommonInput,
    SigmaDhProver, SigmaDhProverInput, TcpChannel, ZpGroup,
};

#[derive(Parser)]
#[command(name = "committer")]
#[command(about = "Pedersen committer and sigma-DH prover", long_about = None)]
struct Cli {
    /// Receiver address to connect to.
    #[arg(long, default_value = "127.0.0.1:7300")]
    address: String,

    /// Number of commit/decommit/proof iterations.
    #[arg(long, default_value_t = 3)]
    iterations: usize,

    /// Soundness parameter of the sigma protocol, in bits.
    #[arg(long, default_value_t = 80)]
    soundness: u32,

    /// The value to commit to.
    #[arg(long, default_value_t = 42)]
    value: u64,
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
        "CmtPedersenCommitter",
        cli.iterations,
        vec![
            cli.address.clone(),
            cli.iterations.to_string(),
            cli.soundness.to_string(),
            cli.value.to_string(),
        ],
        vec![
            "commit".to_string(),
            "decommit".to_string(),
            "dh_proof".to_string(),
        ],
    );

    let group = ZpGroup::rfc5114_2048_256();
    let channel = TcpChannel::connect(&cli.address)?;
    info!(address = %cli.address, "connected to receiver");

    let mut committer =
        PedersenCommitter::new(group.clone(), Some(channel), SecureRng::new())?;
    committer.preprocess()?;
    let h = committer
        .preprocessed_values()
        .expect("preprocess has just run")
        .clone();

    for iteration in 0..cli.iterations {
        let id = iteration as u64;

        measurement.start_sub_task("commit", iteration);
        let commit_msg = committer
            .generate_commitment_message(CommitValue::BigInteger(BigUint::from(cli.value)), id)?;
        committer.channel_mut().write_with_size(&commit_msg.to_bytes())?;
        measurement.end_sub_task("commit", iteration);

        measurement.start_sub_task("decommit", iteration);
        let decommit_msg = committer.generate_decommitment_message(id)?;
        committer
            .channel_mut()
            .write_with_size(&decommit_msg.to_bytes())?;
        measurement.end_sub_task("decommit", iteration);

        measurement.start_sub_task("dh_proof", iteration);
        run_proof_round(&group, &h, cli.soundness, committer.channel_mut())?;
        measurement.end_sub_task("dh_proof", iteration);

        info!(iteration, "iteration finished");
    }

    measurement.finish()?;
    Ok(())
}

/// Proves knowledge of a fresh w with u = g^w, v = h^w, sending (u, v), the
/// first message, and the response, and reading the challenge in between.
fn run_proof_round<C: Channel>(
    group: &ZpGroup,
    h: &<ZpGroup as DlogGroup>::Element,
    soundness: u32,
    channel: &mut C,
) -> Result<()> {
    let mut rng = SecureRng::new();
    let w = group.random_exponent(&mut rng);
    let u = group.exponentiate(group.generator(), &w);
    let v = group.exponentiate(h, &w);
    let common = SigmaDhCommonInput::new(h.clone(), u.clone(), v.clone());

    channel.write_with_size(&group.element_to_bytes(&u))?;
    channel.write_with_size(&group.element_to_bytes(&v))?;

    let mut prover = SigmaDhProver::new(group.clone(), soundness, rng)?;
    let first = prover.compute_first_message(SigmaDhProverInput::new(common, w))?;
    channel.write_with_size(&first.to_bytes())?;

    let challenge = channel.read_with_size()?;
    let second = prover.compute_second_message(&challenge)?;
    channel.write_with_size(&second.to_bytes())?;
    Ok(())
}
