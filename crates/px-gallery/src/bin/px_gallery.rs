use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::{Rgb, RgbImage};
use px_compose::{Character, CharacterTable, ComposedGlyph, compose_all};
use px_contour::{ContourConfig, ContourKind, ContourSet, FillRule, Orientation, rasterize};
use px_core::PixelImage;
use px_emit::{DEFAULT_PIXEL_SIZE, EmitConfig, PenCommand, RecordingPen, draw_glyph};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "px_gallery")]
#[command(about = "Outline pixel glyph tables and verify the results")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose, outline and write every glyph of a table.
    #[command(name = "outline")]
    Outline(OutlineArgs),
    /// Compose and outline every glyph, writing nothing.
    #[command(name = "check")]
    Check(TableArgs),
}

#[derive(Args, Debug, Clone)]
struct TableArgs {
    #[arg(long, required = true)]
    characters: PathBuf,
    #[arg(long)]
    diacritics: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_PIXEL_SIZE)]
    pixel_size: f32,
    /// Wind outer contours clockwise instead of counter-clockwise.
    #[arg(long, default_value_t = false)]
    clockwise: bool,
}

#[derive(Args, Debug, Clone)]
struct OutlineArgs {
    #[command(flatten)]
    table: TableArgs,
    /// Directory receiving `glyphs/`, previews and `summary.json`.
    #[arg(long, required = true)]
    out: PathBuf,
    /// Preview pixels per glyph pixel.
    #[arg(long, default_value_t = 16)]
    preview_scale: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i32),
    Str(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterDto {
    codepoint: u32,
    name: String,
    #[serde(default)]
    pixels: Option<Vec<Vec<u8>>>,
    #[serde(default)]
    descent: Option<f32>,
    #[serde(default)]
    reference: Option<u32>,
    #[serde(default)]
    diacritic: Option<String>,
    #[serde(default)]
    diacritic_space: Option<IntOrString>,
}

#[derive(Debug, Clone, Deserialize)]
struct DiacriticDto {
    pixels: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize)]
struct ContourDto {
    kind: &'static str,
    area: i64,
    points: Vec<[i32; 2]>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum CommandDto {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    ClosePath,
}

#[derive(Debug, Clone, Serialize)]
struct GlyphDto {
    codepoint: u32,
    name: String,
    origin: [i32; 2],
    width: usize,
    height: usize,
    offset: [f32; 2],
    contours: Vec<ContourDto>,
    commands: Vec<CommandDto>,
}

#[derive(Debug, Clone, Serialize)]
struct FailureDto {
    codepoint: u32,
    name: String,
    error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
struct MetaOutline {
    pixel_size: f32,
    orientation: &'static str,
    fill_rule: &'static str,
    glyph_count: usize,
    contour_count: usize,
    hole_count: usize,
    failures: Vec<FailureDto>,
}

/// One successfully outlined glyph.
struct Outlined {
    name: String,
    glyph: ComposedGlyph,
    set: ContourSet,
    filled: PixelImage,
    pen: RecordingPen,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Outline(args) => run_outline(args),
        Command::Check(args) => run_check(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let format = tracing_subscriber::fmt::format().compact();
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .event_format(format)
        .init();
}

fn run_outline(args: OutlineArgs) -> Result<()> {
    if args.preview_scale == 0 {
        bail!("--preview-scale must be at least 1.");
    }

    let table = load_table(&args.table)?;
    let cfg = emit_config(&args.table)?;
    let (outlined, meta) = outline_table(&table, &cfg)?;

    let glyph_dir = args.out.join("glyphs");
    fs::create_dir_all(&glyph_dir)
        .with_context(|| format!("creating output directory {}", glyph_dir.display()))?;

    for item in &outlined {
        let stem = file_stem(&item.name, item.glyph.codepoint);
        write_json(glyph_dir.join(format!("{stem}.json")), &glyph_dto(item))?;

        let preview = render_preview(&item.filled, &item.set, args.preview_scale);
        let path = glyph_dir.join(format!("{stem}.png"));
        preview
            .save(&path)
            .with_context(|| format!("saving preview {}", path.display()))?;
    }

    write_json(args.out.join("summary.json"), &meta)?;
    info!(
        glyphs = meta.glyph_count,
        contours = meta.contour_count,
        out = %args.out.display(),
        "wrote outlines"
    );

    finish(&meta)
}

fn run_check(args: TableArgs) -> Result<()> {
    let table = load_table(&args)?;
    let cfg = emit_config(&args)?;
    let (_, meta) = outline_table(&table, &cfg)?;

    info!(
        glyphs = meta.glyph_count,
        contours = meta.contour_count,
        holes = meta.hole_count,
        "all outlines round-trip"
    );

    finish(&meta)
}

fn finish(meta: &MetaOutline) -> Result<()> {
    if !meta.failures.is_empty() {
        for f in &meta.failures {
            warn!(codepoint = f.codepoint, name = %f.name, "{}", f.error);
        }
        bail!("{} character(s) failed to compose.", meta.failures.len());
    }
    Ok(())
}

fn emit_config(args: &TableArgs) -> Result<EmitConfig> {
    if !(args.pixel_size.is_finite() && args.pixel_size > 0.0) {
        bail!("--pixel-size must be a positive number, got {}.", args.pixel_size);
    }

    let orientation = if args.clockwise {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    };

    Ok(EmitConfig {
        pixel_size: args.pixel_size,
        contour: ContourConfig { orientation },
    })
}

/// Composes and outlines every glyph. Composition failures are collected;
/// an outline that does not fill back to its image aborts the run.
fn outline_table(table: &CharacterTable, cfg: &EmitConfig) -> Result<(Vec<Outlined>, MetaOutline)> {
    let mut meta = MetaOutline {
        pixel_size: cfg.pixel_size,
        orientation: orientation_name(cfg.contour.orientation),
        fill_rule: "nonzero",
        ..MetaOutline::default()
    };
    let mut outlined = Vec::new();

    for (codepoint, result) in compose_all(table) {
        let name = table
            .get(codepoint)
            .map(|c| c.name.clone())
            .unwrap_or_default();

        let glyph = match result {
            Ok(glyph) => glyph,
            Err(err) => {
                meta.failures.push(FailureDto {
                    codepoint,
                    name,
                    error: err.to_string(),
                });
                continue;
            }
        };

        let mut pen = RecordingPen::new();
        let set = draw_glyph(&glyph, cfg, &mut pen);
        let filled = rasterize(&set.contours, FillRule::NonZero)
            .with_context(|| format!("filling outline of '{name}'"))?;
        if !filled.same_pixels(&glyph.image) {
            bail!(
                "outline of '{}' (U+{:04X}) does not reproduce its pixels.",
                name,
                codepoint
            );
        }

        debug!(
            codepoint,
            name = %name,
            contours = set.len(),
            holes = set.num_holes(),
            "outlined glyph"
        );

        meta.glyph_count += 1;
        meta.contour_count += set.len();
        meta.hole_count += set.num_holes();
        outlined.push(Outlined {
            name,
            glyph,
            set,
            filled,
            pen,
        });
    }

    Ok((outlined, meta))
}

fn load_table(args: &TableArgs) -> Result<CharacterTable> {
    ensure_file_exists(&args.characters, "characters")?;
    let characters: Vec<CharacterDto> = read_json(&args.characters)
        .with_context(|| format!("reading character table {}", args.characters.display()))?;

    let mut table = CharacterTable::new();
    for dto in characters {
        let ch = character_from_dto(dto)?;
        if let Some(old) = table.insert(ch) {
            warn!(codepoint = old.codepoint, name = %old.name, "duplicate codepoint replaced");
        }
    }

    if let Some(path) = &args.diacritics {
        ensure_file_exists(path, "diacritics")?;
        let diacritics: HashMap<String, DiacriticDto> = read_json(path)
            .with_context(|| format!("reading diacritic table {}", path.display()))?;
        for (name, dto) in diacritics {
            table.insert_diacritic(name, dto.pixels);
        }
    }

    info!(characters = table.len(), "loaded character table");
    Ok(table)
}

fn character_from_dto(dto: CharacterDto) -> Result<Character> {
    let diacritic_space = match dto.diacritic_space {
        None => 0,
        Some(IntOrString::Int(v)) => v,
        Some(IntOrString::Str(s)) => s.trim().parse().with_context(|| {
            format!(
                "parsing diacriticSpace '{}' of '{}' as an integer",
                s, dto.name
            )
        })?,
    };

    Ok(Character {
        codepoint: dto.codepoint,
        name: dto.name,
        pixels: dto.pixels,
        descent: dto.descent,
        reference: dto.reference,
        diacritic: dto.diacritic,
        diacritic_space,
    })
}

fn glyph_dto(item: &Outlined) -> GlyphDto {
    let contours = item
        .set
        .iter()
        .map(|c| ContourDto {
            kind: contour_kind_name(c.kind),
            area: c.area,
            points: c.points.iter().map(|p| [p.x, p.y]).collect(),
        })
        .collect();

    let commands = item
        .pen
        .commands
        .iter()
        .map(|cmd| match *cmd {
            PenCommand::MoveTo(p) => CommandDto::MoveTo { x: p.x, y: p.y },
            PenCommand::LineTo(p) => CommandDto::LineTo { x: p.x, y: p.y },
            PenCommand::ClosePath => CommandDto::ClosePath,
        })
        .collect();

    GlyphDto {
        codepoint: item.glyph.codepoint,
        name: item.name.clone(),
        origin: [item.glyph.image.origin_x(), item.glyph.image.origin_y()],
        width: item.glyph.image.width(),
        height: item.glyph.image.height(),
        offset: [item.glyph.offset.x, item.glyph.offset.y],
        contours,
        commands,
    }
}

/// Draws the refilled outline with one pixel of margin, y up, and marks
/// contour corners: red for outer loops, blue for holes.
fn render_preview(filled: &PixelImage, set: &ContourSet, scale: u32) -> RgbImage {
    let (x0, y0) = (set.origin.x - 1, set.origin.y - 1);
    let cols = set.width as u32 + 2;
    let rows = set.height as u32 + 2;
    let height = rows * scale;

    let mut img = RgbImage::from_pixel(cols * scale, height, Rgb([255, 255, 255]));
    for (x, y) in filled.iter_on() {
        let (cx, cy) = ((x - x0) as u32, (y - y0) as u32);
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(cx * scale + dx, height - 1 - (cy * scale + dy), Rgb([40, 40, 40]));
            }
        }
    }

    for c in set.iter() {
        let color = match c.kind {
            ContourKind::Outer => Rgb([230, 50, 50]),
            ContourKind::Hole => Rgb([50, 90, 230]),
        };
        for p in &c.points {
            let px = ((p.x - x0) as u32 * scale) as i64;
            let py = height as i64 - ((p.y - y0) as u32 * scale) as i64;
            draw_dot(&mut img, px, py, color);
        }
    }

    img
}

fn draw_dot(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || ny < 0 {
                continue;
            }
            let (ux, uy) = (nx as u32, ny as u32);
            if ux >= img.width() || uy >= img.height() {
                continue;
            }
            img.put_pixel(ux, uy, color);
        }
    }
}

fn file_stem(name: &str, codepoint: u32) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        format!("u{codepoint:04X}")
    } else {
        format!("u{codepoint:04X}_{stem}")
    }
}

fn contour_kind_name(kind: ContourKind) -> &'static str {
    match kind {
        ContourKind::Outer => "outer",
        ContourKind::Hole => "hole",
    }
}

fn orientation_name(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::CounterClockwise => "counter_clockwise",
        Orientation::Clockwise => "clockwise",
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::path::Path;

    use super::{
        CharacterDto, Cli, Command, EmitConfig, IntOrString, character_from_dto, file_stem,
        outline_table, render_preview,
    };
    use px_compose::{Character, CharacterTable};

    #[test]
    fn outline_requires_out_dir() {
        let missing = Cli::try_parse_from(["px_gallery", "outline", "--characters", "c.json"]);
        assert!(missing.is_err());

        let cli = Cli::try_parse_from([
            "px_gallery",
            "outline",
            "--characters",
            "c.json",
            "--out",
            "build/glyphs",
        ])
        .expect("valid args");
        let Command::Outline(args) = cli.cmd else {
            panic!("expected outline");
        };
        assert_eq!(args.out, Path::new("build/glyphs"));
        assert_eq!(args.preview_scale, 16);
    }

    #[test]
    fn dto_accepts_original_field_names() {
        let json = r#"[
            {"codepoint": 97, "name": "a", "pixels": [[1, 1], [1, 1]], "descent": 1},
            {"codepoint": 225, "name": "aacute", "reference": 97,
             "diacritic": "acute", "diacriticSpace": "2"},
            {"codepoint": 224, "name": "agrave", "reference": 97,
             "diacritic": "grave", "diacriticSpace": -1}
        ]"#;
        let dtos: Vec<CharacterDto> = serde_json::from_str(json).expect("valid json");
        assert!(matches!(dtos[1].diacritic_space, Some(IntOrString::Str(_))));

        let chars: Vec<Character> = dtos
            .into_iter()
            .map(|d| character_from_dto(d).expect("valid dto"))
            .collect();
        assert_eq!(chars[0].descent, Some(1.0));
        assert_eq!(chars[1].diacritic_space, 2);
        assert_eq!(chars[2].diacritic_space, -1);
        assert_eq!(chars[2].reference, Some(97));
    }

    #[test]
    fn bad_diacritic_space_is_reported() {
        let json = r#"{"codepoint": 1, "name": "x", "diacriticSpace": "two"}"#;
        let dto: CharacterDto = serde_json::from_str(json).expect("valid json");
        let err = character_from_dto(dto).expect_err("not an integer");
        assert!(err.to_string().contains("diacriticSpace"));
    }

    #[test]
    fn outline_table_collects_failures() {
        let table: CharacterTable = [
            Character::new(0x41, "A").with_pixels(vec![vec![1, 1], vec![1, 0]]),
            Character::new(0x42, "B").with_reference(0x99),
        ]
        .into_iter()
        .collect();

        let (outlined, meta) = outline_table(&table, &EmitConfig::default()).expect("no mismatch");
        assert_eq!(outlined.len(), 1);
        assert_eq!(meta.glyph_count, 1);
        assert_eq!(meta.contour_count, 1);
        assert_eq!(meta.failures.len(), 1);
        assert_eq!(meta.failures[0].codepoint, 0x42);

        let preview = render_preview(&outlined[0].filled, &outlined[0].set, 4);
        assert_eq!(preview.dimensions(), (16, 16));
    }

    #[test]
    fn file_stems_are_filesystem_safe() {
        assert_eq!(file_stem("a/b c", 0x61), "u0061_a_b_c");
        assert_eq!(file_stem("", 0x20), "u0020");
    }
}
