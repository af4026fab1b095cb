use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::{Parser, ValueEnum};
use pgarray::{
    Array, ArrayDimension, Bool, Cidr, DecodeOptions, Delimiter, Element, EncodeOptions, Float4,
    Float8, Inet, Int2, Int4, Int8, IsNull, Status, Text, Timestamp, Uuid,
};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "pgarray", version, about = "PostgreSQL array converter")]
struct Args {
    /// Input file path (.txt, .bin or .json). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Element type of the array.
    #[arg(short = 't', long = "type", value_enum, default_value_t = ElementKind::Text)]
    element: ElementKind,

    /// Input format (default: from the file extension, text for stdin).
    #[arg(long, value_enum)]
    from: Option<Format>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    to: Format,

    /// Element delimiter for text literals: , (comma) or ; (semicolon).
    #[arg(long, value_name = "char", value_parser = parse_delimiter)]
    delimiter: Option<Delimiter>,

    /// Element type OID written into binary headers.
    #[arg(long, value_name = "oid")]
    oid: Option<u32>,

    /// Reject binary input whose header names a different element OID.
    #[arg(long = "expect-oid", value_name = "oid")]
    expect_oid: Option<u32>,

    /// Maximum nesting depth accepted when decoding.
    #[arg(long = "max-dimensions", value_name = "number")]
    max_dimensions: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ElementKind {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Text,
    Uuid,
    Inet,
    Cidr,
    Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Binary,
    Json,
}

/// JSON rendering of an array: its shape plus each element's text form.
#[derive(Debug, Serialize, Deserialize)]
struct ArrayView {
    status: Status,
    #[serde(default)]
    dimensions: Vec<ArrayDimension>,
    #[serde(default)]
    elements: Vec<Option<String>>,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input, source) = read_input(args.input.as_deref())?;
    let from = resolve_format(&args, &source)?;

    let output = match args.element {
        ElementKind::Bool => convert::<Bool>(&args, from, &input)?,
        ElementKind::Int2 => convert::<Int2>(&args, from, &input)?,
        ElementKind::Int4 => convert::<Int4>(&args, from, &input)?,
        ElementKind::Int8 => convert::<Int8>(&args, from, &input)?,
        ElementKind::Float4 => convert::<Float4>(&args, from, &input)?,
        ElementKind::Float8 => convert::<Float8>(&args, from, &input)?,
        ElementKind::Text => convert::<Text>(&args, from, &input)?,
        ElementKind::Uuid => convert::<Uuid>(&args, from, &input)?,
        ElementKind::Inet => convert::<Inet>(&args, from, &input)?,
        ElementKind::Cidr => convert::<Cidr>(&args, from, &input)?,
        ElementKind::Timestamp => convert::<Timestamp>(&args, from, &input)?,
    };

    match args.output.as_deref() {
        Some(path) if path != "-" => {
            fs::write(path, &output)?;
            let input_label = match &source {
                InputSource::Stdin => "stdin",
                InputSource::File(path) => path.as_str(),
            };
            println!("✔ Converted {input_label} → {path}");
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&output)?;
        }
    }
    Ok(())
}

fn convert<T: Element>(
    args: &Args,
    from: Format,
    input: &[u8],
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut decode = DecodeOptions::new();
    let mut encode = EncodeOptions::new();
    if let Some(delimiter) = args.delimiter {
        decode = decode.with_delimiter(delimiter);
        encode = encode.with_delimiter(delimiter);
    }
    if let Some(oid) = args.oid {
        encode = encode.with_element_oid(oid);
    }
    if let Some(oid) = args.expect_oid {
        decode = decode.with_expected_element_oid(oid);
    }
    if let Some(max_dimensions) = args.max_dimensions {
        decode = decode.with_max_dimensions(max_dimensions);
    }

    let array: Array<T> = match from {
        Format::Binary => pgarray::from_binary_with_options(input, &decode)?,
        Format::Text => {
            let text = std::str::from_utf8(input)?.trim();
            if text.eq_ignore_ascii_case("null") {
                Array::null()
            } else {
                pgarray::from_text_with_options(text, &decode)?
            }
        }
        Format::Json => from_view(serde_json::from_slice(input)?)?,
    };

    match args.to {
        Format::Binary => Ok(pgarray::to_binary_with_options(&array, &encode)?),
        Format::Text => {
            let text = pgarray::to_text_with_options(&array, &encode)?;
            Ok(text.unwrap_or_else(|| "NULL".to_string()).into_bytes())
        }
        Format::Json => {
            let view = to_view(&array)?;
            Ok(serde_json::to_vec_pretty(&view)?)
        }
    }
}

fn to_view<T: Element>(array: &Array<T>) -> pgarray::Result<ArrayView> {
    let mut elements = Vec::with_capacity(array.elements.len());
    for element in &array.elements {
        let mut text = String::new();
        elements.push(match element.encode_text(&mut text)? {
            IsNull::Yes => None,
            IsNull::No => Some(text),
        });
    }
    Ok(ArrayView {
        status: array.status,
        dimensions: array.dimensions.clone(),
        elements,
    })
}

fn from_view<T: Element>(view: ArrayView) -> pgarray::Result<Array<T>> {
    match view.status {
        Status::Null => return Ok(Array::null()),
        Status::Undefined => return Err(pgarray::Error::undefined("array")),
        Status::Present => {}
    }
    if view.dimensions.is_empty() && view.elements.is_empty() {
        return Ok(Array::empty());
    }
    let elements = view
        .elements
        .iter()
        .map(|text| T::decode_text(text.as_deref()))
        .collect::<pgarray::Result<Vec<_>>>()?;
    Array::new(elements, view.dimensions)
}

fn resolve_format(args: &Args, source: &InputSource) -> Result<Format, Box<dyn Error>> {
    if let Some(from) = args.from {
        return Ok(from);
    }

    match source {
        InputSource::Stdin => Ok(Format::Text),
        InputSource::File(path) => match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("txt") => Ok(Format::Text),
            Some("bin") => Ok(Format::Binary),
            Some("json") => Ok(Format::Json),
            _ => Err("unable to auto-detect input format; use --from".into()),
        },
    }
}

fn read_input(input: Option<&str>) -> Result<(Vec<u8>, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

fn parse_delimiter(raw: &str) -> Result<Delimiter, String> {
    let mut chars = raw.chars();
    match (chars.next().and_then(Delimiter::from_char), chars.next()) {
        (Some(delimiter), None) => Ok(delimiter),
        _ => Err(format!(
            "Invalid delimiter \"{raw}\". Valid delimiters are: comma (,), semicolon (;)"
        )),
    }
}
