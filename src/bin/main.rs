use std::process::ExitCode;

use clap::Parser;
use num_complex::Complex;
use ssr_fft::{
    errors::SsrFftError,
    numeric::{
        NumericRepresentation, TableNumeric,
        fixed::{Overflow, Quantization},
    },
    parameters::SsrParameters,
    permutation::CrissCrossNetwork,
    tables::{TableConfig, TableTraits},
};
use tracing::{info, info_span};
use tracing_forest::{ForestLayer, util::LevelFilter};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short = 'l', long = "length", default_value = "1024")]
    transform_len: usize,

    #[arg(short = 'r', long, default_value = "4")]
    radix: usize,

    /// `float`, `double` or `fixed<W,I>`.
    #[arg(long = "repr", default_value = "float")]
    representation: NumericRepresentation,

    /// Quantization of a fixed-point representation.
    #[arg(long, default_value = "truncate")]
    quantization: Quantization,

    /// Overflow handling of a fixed-point representation.
    #[arg(long, default_value = "wrap")]
    overflow: Overflow,

    #[arg(short = 'm', long, default_value = "16")]
    min_table_len: usize,
}

fn representation(args: &Args) -> NumericRepresentation {
    match args.representation {
        NumericRepresentation::Fixed(format) => NumericRepresentation::Fixed(
            format
                .with_quantization(args.quantization)
                .with_overflow(args.overflow),
        ),
        other => other,
    }
}

fn run(args: &Args) -> Result<bool, SsrFftError> {
    let params = SsrParameters::new(args.transform_len, args.radix)?;
    let representation = representation(args);
    let config = TableConfig::new(args.min_table_len)?;

    let traits = TableTraits::cached(params, representation, config);
    println!("=========================================");
    println!("SSR FFT tables");
    println!("{traits}");
    println!(
        "storage: twiddle {} bits, exp {} bits",
        traits.twiddle_table_bits(),
        traits.exp_table_bits()
    );

    let network = CrissCrossNetwork::new(params)?;

    // Ramp through the unit circle, quantized like a table entry would be.
    let samples: Vec<_> = (0..params.transform_len())
        .map(|i| {
            let phase = i as f64 / params.transform_len() as f64;
            representation.complex_from_f64(Complex::from_polar(0.5, std::f64::consts::TAU * phase))
        })
        .collect();

    let restored = {
        let _span = info_span!("reorder", cycles = params.lane_depth()).entered();
        let lanes = network.scatter(&samples);
        network.drain(&lanes) == samples
    };
    info!(restored, "criss-cross drain finished");
    println!("canonical order restored: {restored}");
    Ok(restored)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use ssr_fft::numeric::fixed::FixedFormat;

    use super::*;

    #[test]
    fn test_repr_accepts_fixed_format() {
        let args = Args::try_parse_from([
            "main",
            "--repr",
            "fixed<12,3>",
            "--quantization",
            "round",
            "--overflow",
            "saturate",
        ])
        .unwrap();

        assert_eq!(
            representation(&args),
            NumericRepresentation::Fixed(FixedFormat::new(12, 3).unwrap().rounding_saturating())
        );
    }

    #[test]
    fn test_repr_float_ignores_fixed_policies() {
        let args = Args::try_parse_from(["main", "--repr", "double", "--quantization", "round"])
            .unwrap();
        assert_eq!(representation(&args), NumericRepresentation::Double);
    }

    #[test]
    fn test_repr_rejects_bad_format() {
        assert!(Args::try_parse_from(["main", "--repr", "fixed<0,0>"]).is_err());
        assert!(Args::try_parse_from(["main", "--repr", "half"]).is_err());
    }
}
