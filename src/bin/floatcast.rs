//! Command-line front end: parse a floating point literal, convert it to
//! the chosen target format, and print the bit-level breakdown of the
//! result together with the conversion error.

use clap::Parser;
use floatcast::{
    convert_real, decompose_bits, Conversion, FieldBits, FloatFormat,
    OverflowPolicy, Real, RoundingMode, Semantics, Status, UnderflowPolicy,
    BFLOAT16, BINARY16, BINARY32,
};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "floatcast",
    about = "Convert a floating point literal into a narrow binary format"
)]
struct Args {
    /// Input floating point literal, decimal (1.25e-3) or hexfloat
    /// (0x1.8p3).
    num: String,

    /// Target format (float32/fp32/binary32, float16/fp16/binary16,
    /// bfloat16/bf16).
    #[arg(long, default_value = "float32")]
    format: String,

    /// Rounding mode (rne, rno, rtz, rtposinf, rtneginf, rthalfzero,
    /// rthalfposinf, rthalfneginf).
    #[arg(long = "round-mode", default_value = "rne")]
    round_mode: String,

    /// Overflow behavior (satmax, satinf, nan).
    #[arg(long = "overflow-mode", default_value = "satmax")]
    overflow_mode: String,

    /// Underflow behavior (satmin, flushzero).
    #[arg(long = "underflow-mode", default_value = "satmin")]
    underflow_mode: String,

    /// Precision, in bits, used for parsing the input.
    #[arg(long, default_value_t = 53)]
    precision: u32,
}

fn parse_format(name: &str) -> Option<&'static FloatFormat> {
    match name.to_lowercase().as_str() {
        "float32" | "fp32" | "binary32" => Some(&BINARY32),
        "float16" | "fp16" | "binary16" => Some(&BINARY16),
        "bfloat16" | "bf16" => Some(&BFLOAT16),
        _ => None,
    }
}

fn parse_rounding_mode(name: &str) -> Option<RoundingMode> {
    match name.to_lowercase().as_str() {
        "rne" => Some(RoundingMode::NearestEven),
        "rno" => Some(RoundingMode::NearestOdd),
        "rtz" => Some(RoundingMode::TowardZero),
        "rtposinf" => Some(RoundingMode::TowardPositive),
        "rtneginf" => Some(RoundingMode::TowardNegative),
        "rthalfzero" => Some(RoundingMode::HalfTowardZero),
        "rthalfposinf" => Some(RoundingMode::HalfTowardPositive),
        "rthalfneginf" => Some(RoundingMode::HalfTowardNegative),
        _ => None,
    }
}

fn parse_overflow_mode(name: &str) -> Option<OverflowPolicy> {
    match name.to_lowercase().as_str() {
        "nan" => Some(OverflowPolicy::MakeNan),
        "satmax" => Some(OverflowPolicy::SaturateMax),
        "satinf" => Some(OverflowPolicy::SaturateInf),
        _ => None,
    }
}

fn parse_underflow_mode(name: &str) -> Option<UnderflowPolicy> {
    match name.to_lowercase().as_str() {
        "satmin" => Some(UnderflowPolicy::SaturateMin),
        "flushzero" => Some(UnderflowPolicy::FlushToZero),
        _ => None,
    }
}

/// Render the three fields as a right-aligned two-row table.
fn field_table(fields: &FieldBits) -> String {
    let headers = ["Sign", "Exponent", "Mantissa"];
    let values = [
        String::from_utf8_lossy(&fields.sign).into_owned(),
        String::from_utf8_lossy(&fields.exponent).into_owned(),
        String::from_utf8_lossy(&fields.mantissa).into_owned(),
    ];

    let mut head = String::new();
    let mut row = String::new();
    for (h, v) in headers.iter().zip(values.iter()) {
        let width = h.len().max(v.len()) + 2;
        head.push_str(&format!("{:>width$}|", h, width = width));
        row.push_str(&format!("{:>width$}|", v, width = width));
    }
    format!("{}\n{}\n", head, row)
}

/// Render a bit pattern as a hexadecimal floating point literal, the way
/// the `%x` formatting of a float reads.
fn hexfloat(bits: u64, fmt: &FloatFormat) -> String {
    let sign = if fmt.sign_of(bits) { "-" } else { "" };
    let mlen = fmt.mantissa_len();
    let exp_all_ones = (1u64 << fmt.exponent_len()) - 1;
    let exp_field = fmt.exponent_field(bits);
    let mant = fmt.mantissa_field(bits);

    if exp_field == exp_all_ones {
        return if mant == 0 {
            format!("{}Inf", sign)
        } else {
            "NaN".to_string()
        };
    }
    if exp_field == 0 && mant == 0 {
        return format!("{}0x0p+00", sign);
    }

    let mut exp;
    let mut sig = mant;
    if exp_field == 0 {
        // Normalize the subnormal so the leading hex digit is 1.
        exp = fmt.min_exp();
        while sig >> mlen == 0 {
            sig <<= 1;
            exp -= 1;
        }
    } else {
        exp = exp_field as i64 - fmt.bias();
        sig |= 1u64 << mlen;
    }

    let nibbles = (mlen as usize + 3) / 4;
    let frac = (sig & ((1u64 << mlen) - 1)) << (nibbles as u32 * 4 - mlen);
    let mut digits = format!("{:0width$x}", frac, width = nibbles);
    while digits.ends_with('0') {
        digits.pop();
    }

    if digits.is_empty() {
        format!("{}0x1p{:+03}", sign, exp)
    } else {
        format!("{}0x1.{}p{:+03}", sign, digits, exp)
    }
}

/// The difference between the encoded value and the input, as a decimal
/// string. NaN results carry no ordered error.
fn conversion_error(encoded: &Real, input: &Real) -> String {
    if encoded.is_nan() || input.is_nan() {
        return "NaN".to_string();
    }
    if encoded.is_inf()
        && input.is_inf()
        && encoded.get_sign() == input.get_sign()
    {
        return "0.0".to_string();
    }

    let sem = Semantics::arbitrary(
        input.get_semantics().precision().max(64) + 16,
    );
    let a = encoded.cast(sem, RoundingMode::NearestEven);
    let b = input.cast(sem, RoundingMode::NearestEven);
    Real::sub_with_rm(&a, &b, RoundingMode::NearestEven).to_string()
}

fn report(
    target: &FloatFormat,
    res: Conversion,
    input: &Real,
) {
    let decoded = Real::from_bits(target, res.bits);
    let fields = decompose_bits(res.bits, target);
    let hex_width = (target.width() as usize + 3) / 4;

    println!("{}", capitalized(target.name()));
    print!("{}", field_table(&fields));
    println!("Decimal: {}", decoded);
    println!("Hexfloat: {}", hexfloat(res.bits, target));
    println!(
        "Conversion Error: {} ({})",
        conversion_error(&decoded, input),
        res.accuracy
    );
    println!("Binary: 0b{}", fields.bit_string());
    println!("Hexadecimal: {:#0width$x}", res.bits, width = hex_width + 2);
    if res.status != Status::Fits {
        println!("{}", res.status.to_string().to_uppercase());
    }
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(target) = parse_format(&args.format) else {
        eprintln!("Unsupported format {}", args.format);
        return ExitCode::FAILURE;
    };
    let Some(rm) = parse_rounding_mode(&args.round_mode) else {
        eprintln!("Unsupported rounding mode {}", args.round_mode);
        return ExitCode::FAILURE;
    };
    let Some(om) = parse_overflow_mode(&args.overflow_mode) else {
        eprintln!("Unsupported overflow mode {}", args.overflow_mode);
        return ExitCode::FAILURE;
    };
    let Some(um) = parse_underflow_mode(&args.underflow_mode) else {
        eprintln!("Unsupported underflow mode {}", args.underflow_mode);
        return ExitCode::FAILURE;
    };
    if args.precision < 2 {
        eprintln!("Precision must be at least 2 bits");
        return ExitCode::FAILURE;
    }

    let sem = Semantics::arbitrary(args.precision);
    let input = match Real::parse(&args.num, sem, rm) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}: {}", e, args.num);
            return ExitCode::FAILURE;
        }
    };

    let res = convert_real(&input, target, rm, om, um);
    report(target, res, &input);
    ExitCode::SUCCESS
}
