use std::io::{BufWriter, Write};

use anyhow::Context;
use idforge::{
    MonoUlidGenerator, MonotonicClock, NanoIdGenerator, RandBytes, SeededRandom,
    SnowflakeGenerator, ThreadRandom, UlidGenerator,
};

use super::config::{NanoidRun, RunConfig, SnowflakeRun, UlidRun};

/// Generates the requested IDs and writes them to `out`, one per line.
pub fn run(config: &RunConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let mut out = BufWriter::new(out);
    match config {
        RunConfig::Snowflake(run) => snowflake(run, &mut out)?,
        RunConfig::Ulid(run) => ulid(run, &mut out)?,
        RunConfig::Nanoid(run) => nanoid(run, &mut out)?,
    }
    out.flush().context("failed to flush output")?;
    Ok(())
}

fn snowflake(run: &SnowflakeRun, out: &mut impl Write) -> anyhow::Result<()> {
    let generator = SnowflakeGenerator::new(run.config.clone(), MonotonicClock::new())?;
    let epoch_ms = run.config.epoch.as_millis();

    for _ in 0..run.count {
        let id = generator
            .generate()
            .context("failed to generate snowflake id")?;
        if run.decompose {
            let parts = generator.decompose(id);
            writeln!(
                out,
                "{id} timestamp={} unix_ms={} datacenter_id={} worker_id={} sequence={}",
                parts.timestamp,
                epoch_ms + u128::from(parts.timestamp),
                parts.datacenter_id,
                parts.worker_id,
                parts.sequence,
            )?;
        } else {
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}

fn ulid(run: &UlidRun, out: &mut impl Write) -> anyhow::Result<()> {
    let clock = MonotonicClock::new();
    match run.monotonic {
        Some(policy) => {
            let generator = MonoUlidGenerator::with_policy(clock, ThreadRandom, policy);
            for _ in 0..run.count {
                let id = generator.generate().context("failed to generate ulid")?;
                writeln!(out, "{id}")?;
            }
        }
        None => {
            let generator = UlidGenerator::new(clock, ThreadRandom);
            for _ in 0..run.count {
                let id = generator.generate().context("failed to generate ulid")?;
                writeln!(out, "{id}")?;
            }
        }
    }
    Ok(())
}

fn nanoid(run: &NanoidRun, out: &mut impl Write) -> anyhow::Result<()> {
    match run.seed {
        Some(seed) => write_nanoids(&NanoIdGenerator::new(SeededRandom::new(seed)), run, out),
        None => write_nanoids(&NanoIdGenerator::new(ThreadRandom), run, out),
    }
}

fn write_nanoids<R: RandBytes>(
    generator: &NanoIdGenerator<R>,
    run: &NanoidRun,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    for _ in 0..run.count {
        let id = generator
            .generate_from(&run.alphabet, run.size)
            .context("failed to generate nanoid")?;
        writeln!(out, "{id}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use idforge::{SnowflakeId, Ulid};

    use super::*;
    use crate::cli::config::CliArgs;

    fn output(argv: &[&str]) -> Vec<String> {
        let config = RunConfig::try_from(CliArgs::try_parse_from(argv).unwrap()).unwrap();
        let mut buf = Vec::new();
        run(&config, &mut buf).unwrap();
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn prints_one_snowflake_per_line_in_order() {
        let lines = output(&["idforge", "snowflake", "-n", "100", "--worker-id", "3"]);
        assert_eq!(lines.len(), 100);

        let ids: Vec<u64> = lines.iter().map(|l| l.parse().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|&id| SnowflakeId::from_raw(id).to_i64() > 0));
    }

    #[test]
    fn decompose_prints_fields() {
        let lines = output(&[
            "idforge",
            "snowflake",
            "--datacenter-id",
            "2",
            "--worker-id",
            "7",
            "--decompose",
        ]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("datacenter_id=2 worker_id=7 sequence=0"));
    }

    #[test]
    fn monotonic_ulids_are_strictly_ordered() {
        let lines = output(&["idforge", "ulid", "--monotonic", "-n", "1000"]);
        assert_eq!(lines.len(), 1000);
        assert!(lines.windows(2).all(|w| w[0] < w[1]));
        for line in &lines {
            assert_eq!(line.len(), 26);
            assert!(line.parse::<Ulid>().is_ok());
        }
    }

    #[test]
    fn seeded_nanoids_are_reproducible() {
        let argv = [
            "idforge", "nanoid", "-n", "5", "--size", "10", "--alphabet", "abcdef", "--seed", "9",
        ];
        let first = output(&argv);
        assert_eq!(first, output(&argv));
        assert_eq!(first.len(), 5);
        assert!(
            first
                .iter()
                .all(|id| id.len() == 10 && id.chars().all(|c| "abcdef".contains(c)))
        );
    }
}
