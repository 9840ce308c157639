use nulltrace_htmlui::{
    render_markup, ConvertError, ConvertOptions, ConverterConfig, HtmlConverter,
    MarkdownConverter, UiNode,
};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Format {
    Json,
    Markup,
}

struct Args {
    markdown: bool,
    format: Format,
    config: Option<String>,
    files: Vec<String>,
}

fn usage() {
    eprintln!("Usage: htmlui-convert [--markdown] [--format json|markup] [--config <file.yaml>] <file>...");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  htmlui-convert page.html");
    eprintln!("  htmlui-convert --markdown --format markup README.md");
    eprintln!("  htmlui-convert --config htmlui.yaml *.html");
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        markdown: false,
        format: Format::Json,
        config: None,
        files: Vec::new(),
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--markdown" | "-m" => args.markdown = true,
            "--format" | "-f" => {
                args.format = match iter.next().as_deref() {
                    Some("json") => Format::Json,
                    Some("markup") => Format::Markup,
                    other => return Err(format!("Unknown format: {}", other.unwrap_or(""))),
                };
            }
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or_else(|| "--config requires a path".to_string())?;
                args.config = Some(path);
            }
            "--help" | "-h" => return Err(String::new()),
            flag if flag.starts_with('-') => return Err(format!("Unknown option: {}", flag)),
            _ => args.files.push(arg),
        }
    }

    if args.files.is_empty() {
        return Err(String::new());
    }
    Ok(args)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("{}", msg);
                eprintln!();
            }
            usage();
            process::exit(1);
        }
    };

    let options = match args.config.as_deref().map(ConverterConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default().to_options(),
        Err(e) => {
            eprintln!("✗ invalid config: {}", e);
            process::exit(1);
        }
    };

    let html = HtmlConverter::new();
    let mut exit_code = 0;

    for file_path in &args.files {
        match convert_file(file_path, &args, &html, &options).await {
            Ok(nodes) => print_nodes(&nodes, args.format),
            Err(e) => {
                eprintln!("✗ {}: {}", file_path, e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

async fn convert_file(
    path: &str,
    args: &Args,
    html: &HtmlConverter,
    options: &ConvertOptions,
) -> Result<Vec<UiNode>, ConvertError> {
    let content = fs::read_to_string(path)?;

    if args.markdown {
        let markdown = MarkdownConverter::new();
        markdown.set_content(&content).await?;
        Ok(markdown.render(options))
    } else {
        Ok(html.convert(&content, options))
    }
}

fn print_nodes(nodes: &[UiNode], format: Format) {
    match format {
        Format::Markup => println!("{}", render_markup(nodes)),
        Format::Json => match serde_json::to_string_pretty(nodes) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("✗ failed to serialize UI tree: {}", e),
        },
    }
}
