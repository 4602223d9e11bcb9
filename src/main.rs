use clap::Parser;
use quote_pdf::pagesize::{self, PageOrientation};
use quote_pdf::{
    render_pdf, CompanyProfile, DocumentConfig, DocumentKind, DocumentModel, GenerationError,
    ImageRef,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Render a quotation or invoice from its JSON document model
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Document model (JSON)
    input: PathBuf,

    /// Output file or directory; defaults to `<document id>.pdf` in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// quotation or invoice
    #[arg(short, long, default_value = "quotation")]
    kind: DocumentKind,

    /// Issuing company profile (JSON with name, address, email, phone)
    #[arg(long)]
    company: Option<PathBuf>,

    /// Logo image shown in the header banner
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Signature image shown above the signature line
    #[arg(long)]
    signature: Option<PathBuf>,

    /// Paper format: a3, a4, a5, letter or legal
    #[arg(long, default_value = "a4")]
    page_size: String,

    /// Lay pages out in landscape orientation
    #[arg(long)]
    landscape: bool,

    /// Multiplier applied to every font size
    #[arg(long, default_value_t = 1.0)]
    font_scale: f32,

    /// Currency symbol printed before amounts
    #[arg(long, default_value = "$")]
    currency: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: Args) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let model = DocumentModel::from_json(&std::fs::read_to_string(&args.input)?)?;

    let page_size = pagesize::by_name(&args.page_size).ok_or_else(|| {
        GenerationError::Configuration(format!("unknown page size '{}'", args.page_size))
    })?;
    let page_size = if args.landscape {
        page_size.landscape()
    } else {
        page_size
    };

    let mut config = DocumentConfig::for_kind(args.kind)
        .with_page_size(page_size)
        .with_font_scale(args.font_scale)
        .with_currency_symbol(&args.currency);
    if let Some(path) = &args.company {
        let company: CompanyProfile = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config = config.with_company(company);
    }
    if let Some(path) = &args.logo {
        config = config.with_logo(ImageRef::from_path(path)?);
    }
    if let Some(path) = &args.signature {
        config = config.with_signature_image(ImageRef::from_path(path)?);
    }

    let rendered = render_pdf(&model, &config)?;
    let path = match args.output {
        Some(dir) if dir.is_dir() => dir.join(&rendered.file_name),
        Some(file) => file,
        None => PathBuf::from(&rendered.file_name),
    };
    std::fs::write(&path, &rendered.bytes)?;
    log::info!("wrote {} page(s) to {}", rendered.pages, path.display());
    Ok(path)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
