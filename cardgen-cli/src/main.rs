//! cardgen command line
//!
//! Renders one card description to an image file.
//!
//! ```text
//! cardgen card.json card.png
//! cardgen --color gold=ffd700 --background 00000000 card.json card.png
//! cardgen --dump-layout card.json card.png > layout.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use cardgen_card::{Card, CardRenderer, card_colors};
use cardgen_markup::Color;
use clap::Parser;
use owo_colors::OwoColorize;

/// cardgen - render a game card from a JSON description
#[derive(Parser, Debug)]
#[command(name = "cardgen")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Render a card
    cardgen card.json card.png

    # Add named colors usable in markup
    cardgen --color gold=ffd700 --color blood=8a0303 card.json card.png

    # Transparent background, print every text layout as JSON
    cardgen --background 00000000 --dump-layout card.json card.png
"#)]
struct Cli {
    /// Card description (JSON)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Image to write; the format follows the extension
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Print each font as it is loaded and the output path when done
    #[arg(short, long)]
    verbose: bool,

    /// Print the typeset text elements as JSON on stdout
    #[arg(long)]
    dump_layout: bool,

    /// Canvas background: hex (RRGGBB or AARRGGBB) or any palette name,
    /// including ones added with --color or by the card
    #[arg(long, value_name = "COLOR", default_value = "black")]
    background: String,

    /// Extra named color available to every card, as NAME=HEX (repeatable)
    #[arg(long = "color", value_name = "NAME=HEX", value_parser = parse_named_color)]
    colors: Vec<(String, Color)>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("error: {err:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let card = Card::load(&cli.input)
        .with_context(|| format!("could not load card '{}'", cli.input.display()))?;

    let mut renderer = build_renderer(cli, &card)?;

    if cli.dump_layout {
        let (canvas, placed) = renderer.render_with_layout(&card)?;
        println!("{}", serde_json::to_string_pretty(&placed)?);
        canvas.save(&cli.output)?;
    } else {
        renderer.render(&card)?.save(&cli.output)?;
    }

    if cli.verbose {
        eprintln!("{} {}", "Wrote card:".green(), cli.output.display());
    }
    Ok(())
}

/// A renderer with the `--color` entries registered and the background
/// resolved against them and the card's own colors.
fn build_renderer(cli: &Cli, card: &Card) -> anyhow::Result<CardRenderer> {
    let mut renderer = CardRenderer::new(cli.verbose);
    for (name, color) in &cli.colors {
        renderer.colors_mut().add_color(name.as_str(), *color);
    }
    let background = card_colors(renderer.colors(), card)
        .lookup(&cli.background)
        .with_context(|| {
            format!(
                "background '{}' is neither a known color name nor hex",
                cli.background
            )
        })?;
    Ok(renderer.with_background(background))
}

/// Parse `NAME=HEX`.
fn parse_named_color(value: &str) -> Result<(String, Color), String> {
    let (name, hex) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=HEX, got '{value}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing color name in '{value}'"));
    }
    let color = Color::from_hex(hex.trim()).ok_or_else(|| format!("'{hex}' is not hex"))?;
    Ok((name.to_string(), color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cardgen", "in.json", "out.png"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.json"));
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(cli.background, "black");
        assert!(cli.colors.is_empty());
        assert!(!cli.verbose && !cli.dump_layout);
    }

    #[test]
    fn test_repeated_colors() {
        let cli = Cli::try_parse_from([
            "cardgen",
            "--color",
            "gold=ffd700",
            "--color",
            "ghost=80ffffff",
            "--background",
            "#123456",
            "in.json",
            "out.png",
        ])
        .unwrap();
        assert_eq!(
            cli.colors,
            [
                ("gold".to_string(), Color::rgb(0xff, 0xd7, 0x00)),
                ("ghost".to_string(), Color::rgba(0xff, 0xff, 0xff, 0x80)),
            ]
        );
        assert_eq!(cli.background, "#123456");
    }

    #[test]
    fn test_bad_color_arguments() {
        assert!(parse_named_color("gold").is_err());
        assert!(parse_named_color("=ffd700").is_err());
        assert!(parse_named_color("gold=zz").is_err());
    }

    #[test]
    fn test_background_resolves_against_every_palette() {
        let card = Card::from_json(r#"{ "size": [1, 1], "colors": { "ink": "010203" } }"#).unwrap();
        let render = |args: &[&str]| {
            let argv = ["cardgen"]
                .into_iter()
                .chain(args.iter().copied())
                .chain(["in.json", "out.png"]);
            let cli = Cli::try_parse_from(argv).unwrap();
            build_renderer(&cli, &card)
                .map(|mut renderer| renderer.render(&card).unwrap().pixel(0, 0))
        };

        assert_eq!(render(&[]).unwrap(), Some([0, 0, 0, 255]));
        assert_eq!(render(&["--background", "red"]).unwrap(), Some([255, 0, 0, 255]));
        assert_eq!(
            render(&["--color", "gold=ffd700", "--background", "gold"]).unwrap(),
            Some([0xff, 0xd7, 0x00, 255])
        );
        assert_eq!(render(&["--background", "ink"]).unwrap(), Some([1, 2, 3, 255]));
        assert!(render(&["--background", "not-a-color"]).is_err());
    }

    #[test]
    fn test_missing_output_is_an_error() {
        assert!(Cli::try_parse_from(["cardgen", "in.json"]).is_err());
    }
}
