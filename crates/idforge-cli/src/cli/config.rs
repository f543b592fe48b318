use core::{fmt, time::Duration};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use idforge::{
    Alphabet, DEFAULT_ALPHABET, DEFAULT_SIZE, OverflowPolicy, SnowflakeConfig, SnowflakeLayout,
    TWITTER_EPOCH,
};

/// Runtime configuration for the `idforge` binary.
///
/// Every option can also be set through an `IDFORGE_*` environment variable,
/// and a `.env` file in the working directory is loaded before parsing.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idforge",
    version,
    about = "Generate Snowflake, ULID and NanoId identifiers"
)]
pub struct CliArgs {
    /// Number of IDs to print, one per line.
    ///
    /// Environment variable: `IDFORGE_COUNT`
    #[arg(short = 'n', long, env = "IDFORGE_COUNT", default_value_t = 1, global = true)]
    pub count: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 64-bit time-ordered IDs with datacenter and worker fields.
    Snowflake(SnowflakeArgs),
    /// 128-bit lexicographically sortable IDs in Crockford base32.
    Ulid(UlidArgs),
    /// Random strings over a URL-safe or custom alphabet.
    Nanoid(NanoidArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SnowflakeArgs {
    /// Datacenter field of every generated ID.
    ///
    /// Environment variable: `IDFORGE_DATACENTER_ID`
    #[arg(long, env = "IDFORGE_DATACENTER_ID", default_value_t = 0)]
    pub datacenter_id: u64,

    /// Worker field of every generated ID. Two processes sharing a
    /// datacenter id must never share a worker id.
    ///
    /// Environment variable: `IDFORGE_WORKER_ID`
    #[arg(long, env = "IDFORGE_WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Custom epoch in milliseconds since the UNIX epoch. Defaults to the
    /// Twitter epoch (2010-11-04T01:42:54.657Z).
    ///
    /// Environment variable: `IDFORGE_EPOCH_MS`
    #[arg(long, env = "IDFORGE_EPOCH_MS")]
    pub epoch_ms: Option<u64>,

    /// Environment variable: `IDFORGE_TIMESTAMP_BITS`
    #[arg(long, env = "IDFORGE_TIMESTAMP_BITS", default_value_t = 41)]
    pub timestamp_bits: u8,

    /// Environment variable: `IDFORGE_DATACENTER_BITS`
    #[arg(long, env = "IDFORGE_DATACENTER_BITS", default_value_t = 5)]
    pub datacenter_bits: u8,

    /// Environment variable: `IDFORGE_WORKER_BITS`
    #[arg(long, env = "IDFORGE_WORKER_BITS", default_value_t = 5)]
    pub worker_bits: u8,

    /// Environment variable: `IDFORGE_SEQUENCE_BITS`
    #[arg(long, env = "IDFORGE_SEQUENCE_BITS", default_value_t = 12)]
    pub sequence_bits: u8,

    /// How far the clock may step backwards, in milliseconds, before
    /// generation fails instead of waiting.
    ///
    /// Environment variable: `IDFORGE_CLOCK_TOLERANCE_MS`
    #[arg(long, env = "IDFORGE_CLOCK_TOLERANCE_MS", default_value_t = 0)]
    pub clock_tolerance_ms: u64,

    /// Print each ID's fields next to it.
    ///
    /// Environment variable: `IDFORGE_DECOMPOSE`
    #[arg(long, env = "IDFORGE_DECOMPOSE")]
    pub decompose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct UlidArgs {
    /// Strictly increasing IDs, even within one millisecond.
    ///
    /// Environment variable: `IDFORGE_MONOTONIC`
    #[arg(long, env = "IDFORGE_MONOTONIC")]
    pub monotonic: bool,

    /// On exhaustion of a millisecond's random space, move to the next
    /// millisecond instead of failing. Requires `--monotonic`.
    ///
    /// Environment variable: `IDFORGE_ADVANCE_ON_OVERFLOW`
    #[arg(long, env = "IDFORGE_ADVANCE_ON_OVERFLOW", requires = "monotonic")]
    pub advance_on_overflow: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NanoidArgs {
    /// Length of each ID in symbols.
    ///
    /// Environment variable: `IDFORGE_SIZE`
    #[arg(long, env = "IDFORGE_SIZE", default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// Up to 255 distinct symbols.
    ///
    /// Environment variable: `IDFORGE_ALPHABET`
    #[arg(long, env = "IDFORGE_ALPHABET", default_value_t = String::from(DEFAULT_ALPHABET))]
    pub alphabet: String,

    /// Seed a deterministic generator. Output is reproducible but predictable.
    ///
    /// Environment variable: `IDFORGE_SEED`
    #[arg(long, env = "IDFORGE_SEED")]
    pub seed: Option<u64>,
}

/// A validated generation request.
#[derive(Debug, Clone)]
pub enum RunConfig {
    Snowflake(SnowflakeRun),
    Ulid(UlidRun),
    Nanoid(NanoidRun),
}

#[derive(Debug, Clone)]
pub struct SnowflakeRun {
    pub count: usize,
    pub config: SnowflakeConfig,
    pub decompose: bool,
}

#[derive(Debug, Clone)]
pub struct UlidRun {
    pub count: usize,
    /// `None` selects the stateless generator.
    pub monotonic: Option<OverflowPolicy>,
}

#[derive(Debug, Clone)]
pub struct NanoidRun {
    pub count: usize,
    pub alphabet: Alphabet,
    pub size: usize,
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn count(&self) -> usize {
        match self {
            Self::Snowflake(run) => run.count,
            Self::Ulid(run) => run.count,
            Self::Nanoid(run) => run.count,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Snowflake(_) => Kind::Snowflake,
            Self::Ulid(_) => Kind::Ulid,
            Self::Nanoid(_) => Kind::Nanoid,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Snowflake,
    Ulid,
    Nanoid,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Snowflake => "snowflake",
            Self::Ulid => "ulid",
            Self::Nanoid => "nanoid",
        })
    }
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("IDFORGE_COUNT must be greater than 0");
        }
        let count = args.count;

        Ok(match args.command {
            Command::Snowflake(snow) => Self::Snowflake(SnowflakeRun::try_from((count, snow))?),
            Command::Ulid(ulid) => Self::Ulid(UlidRun {
                count,
                monotonic: ulid.monotonic.then_some(if ulid.advance_on_overflow {
                    OverflowPolicy::AdvanceTimestamp
                } else {
                    OverflowPolicy::Fail
                }),
            }),
            Command::Nanoid(nano) => {
                if nano.size == 0 {
                    bail!("IDFORGE_SIZE must be greater than 0");
                }
                let alphabet = Alphabet::new(&nano.alphabet).context("invalid IDFORGE_ALPHABET")?;
                Self::Nanoid(NanoidRun {
                    count,
                    alphabet,
                    size: nano.size,
                    seed: nano.seed,
                })
            }
        })
    }
}

impl TryFrom<(usize, SnowflakeArgs)> for SnowflakeRun {
    type Error = anyhow::Error;

    fn try_from((count, args): (usize, SnowflakeArgs)) -> Result<Self, Self::Error> {
        let layout = SnowflakeLayout::new(
            args.timestamp_bits,
            args.datacenter_bits,
            args.worker_bits,
            args.sequence_bits,
        )
        .context("invalid snowflake bit layout")?;

        let epoch = args.epoch_ms.map_or(TWITTER_EPOCH, Duration::from_millis);

        let config = SnowflakeConfig::new(args.datacenter_id, args.worker_id)
            .with_epoch(epoch)
            .with_layout(layout)
            .with_clock_tolerance(Duration::from_millis(args.clock_tolerance_ms));
        config.validate().with_context(|| {
            format!(
                "IDFORGE_DATACENTER_ID ({}) or IDFORGE_WORKER_ID ({}) does not fit the layout",
                args.datacenter_id, args.worker_id
            )
        })?;

        Ok(Self {
            count,
            config,
            decompose: args.decompose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<RunConfig> {
        let args = CliArgs::try_parse_from(argv)?;
        RunConfig::try_from(args)
    }

    #[test]
    fn snowflake_defaults_to_twitter_format() {
        let RunConfig::Snowflake(run) = parse(&["idforge", "snowflake"]).unwrap() else {
            panic!("expected snowflake");
        };
        assert_eq!(run.count, 1);
        assert_eq!(run.config, SnowflakeConfig::default());
        assert!(!run.decompose);
    }

    #[test]
    fn snowflake_custom_layout() {
        let config = parse(&[
            "idforge",
            "snowflake",
            "--timestamp-bits",
            "42",
            "--datacenter-bits",
            "0",
            "--worker-bits",
            "10",
            "--sequence-bits",
            "11",
            "--worker-id",
            "1023",
            "--epoch-ms",
            "1420070400000",
            "--clock-tolerance-ms",
            "5",
            "--decompose",
        ])
        .unwrap();
        let RunConfig::Snowflake(run) = config else {
            panic!("expected snowflake");
        };
        assert_eq!(run.config.layout, SnowflakeLayout::new(42, 0, 10, 11).unwrap());
        assert_eq!(run.config.worker_id, 1023);
        assert_eq!(run.config.epoch, Duration::from_millis(1_420_070_400_000));
        assert_eq!(run.config.clock_tolerance, Duration::from_millis(5));
        assert!(run.decompose);
    }

    #[test]
    fn snowflake_rejects_layout_not_summing_to_63() {
        let err = parse(&["idforge", "snowflake", "--sequence-bits", "13"]).unwrap_err();
        assert!(err.to_string().contains("layout"));
    }

    #[test]
    fn snowflake_rejects_worker_id_out_of_range() {
        let err = parse(&["idforge", "snowflake", "--worker-id", "32"]).unwrap_err();
        assert!(err.to_string().contains("IDFORGE_WORKER_ID"));
        assert!(parse(&["idforge", "snowflake", "--worker-id", "31"]).is_ok());
    }

    #[test]
    fn count_is_global_and_positive() {
        let before = parse(&["idforge", "--count", "3", "ulid"]).unwrap();
        let after = parse(&["idforge", "ulid", "-n", "3"]).unwrap();
        assert_eq!(before.count(), 3);
        assert_eq!(after.count(), 3);

        assert!(parse(&["idforge", "ulid", "--count", "0"]).is_err());
    }

    #[test]
    fn ulid_policy_selection() {
        let RunConfig::Ulid(plain) = parse(&["idforge", "ulid"]).unwrap() else {
            panic!("expected ulid");
        };
        assert_eq!(plain.monotonic, None);

        let RunConfig::Ulid(mono) = parse(&["idforge", "ulid", "--monotonic"]).unwrap() else {
            panic!("expected ulid");
        };
        assert_eq!(mono.monotonic, Some(OverflowPolicy::Fail));

        let RunConfig::Ulid(advance) =
            parse(&["idforge", "ulid", "--monotonic", "--advance-on-overflow"]).unwrap()
        else {
            panic!("expected ulid");
        };
        assert_eq!(advance.monotonic, Some(OverflowPolicy::AdvanceTimestamp));
    }

    #[test]
    fn advance_on_overflow_requires_monotonic() {
        assert!(CliArgs::try_parse_from(["idforge", "ulid", "--advance-on-overflow"]).is_err());
    }

    #[test]
    fn nanoid_defaults() {
        let config = parse(&["idforge", "nanoid"]).unwrap();
        assert_eq!(config.kind(), Kind::Nanoid);
        let RunConfig::Nanoid(run) = config else {
            panic!("expected nanoid");
        };
        assert_eq!(run.size, DEFAULT_SIZE);
        assert_eq!(run.alphabet, Alphabet::url_safe());
        assert_eq!(run.seed, None);
    }

    #[test]
    fn nanoid_rejects_bad_alphabet_and_size() {
        let err = parse(&["idforge", "nanoid", "--alphabet", "aab"]).unwrap_err();
        assert!(err.to_string().contains("IDFORGE_ALPHABET"));
        assert!(parse(&["idforge", "nanoid", "--alphabet", ""]).is_err());
        assert!(parse(&["idforge", "nanoid", "--size", "0"]).is_err());
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(CliArgs::try_parse_from(["idforge", "uuid"]).is_err());
        assert!(CliArgs::try_parse_from(["idforge"]).is_err());
    }
}
