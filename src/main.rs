use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use image::RgbaImage;
use serde::Serialize;

use wargfx::data::{Era, PlayerColor};
use wargfx::graphics::font::{self, FontGlyph, FontSink};
use wargfx::graphics::sprite::{self, SpriteFrame};
use wargfx::graphics::tileset::Tileset;
use wargfx::Archive;

#[derive(Parser)]
#[command(name = "wargfx", about = "Extract graphics from WAR data archives")]
struct Cli {
    /// Path to the data archive
    archive: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "./output")]
    out: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print archive header information
    Info,
    /// Export an era palette as a 16x16 swatch image
    Palette {
        #[arg(value_enum)]
        era: Era,
    },
    /// Export every tile of an era's tileset
    Tileset {
        #[arg(value_enum)]
        era: Era,
    },
    /// Export the frames of a unit or building sprite
    Sprite {
        /// Object id from the unit table
        #[arg(long, conflicts_with = "entry")]
        object: Option<u16>,
        /// Decode a sheet entry directly (cursor/UI sheets)
        #[arg(long)]
        entry: Option<usize>,
        #[arg(long, value_enum, default_value_t = Era::Forest)]
        era: Era,
        #[arg(long, value_enum, default_value_t = PlayerColor::Red)]
        color: PlayerColor,
    },
    /// Export a font's glyphs
    Font { id: usize },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> wargfx::Result<()> {
    fs::create_dir_all(&cli.out)?;
    let archive = Archive::open(&cli.archive)?;
    println!(
        "Opened {:?}: file id {}, {} entries",
        cli.archive,
        archive.file_id(),
        archive.entry_count()
    );

    match cli.command {
        Command::Info => cmd_info(&archive),
        Command::Palette { era } => cmd_palette(&archive, era, &cli.out),
        Command::Tileset { era } => cmd_tileset(&archive, era, &cli.out),
        Command::Sprite {
            object,
            entry,
            era,
            color,
        } => cmd_sprite(&archive, object, entry, era, color, &cli.out),
        Command::Font { id } => cmd_font(&archive, id, &cli.out),
    }
}

fn cmd_info(archive: &Archive) -> wargfx::Result<()> {
    for index in 0..archive.entry_count() {
        match archive.entry_info(index) {
            Ok(info) => println!(
                "entry {index:4}: offset {:#010x} flags {:#04x} length {}",
                info.offset, info.flags, info.declared_len
            ),
            Err(e) => println!("entry {index:4}: unreadable header ({e})"),
        }
    }
    Ok(())
}

fn cmd_palette(archive: &Archive, era: Era, out: &Path) -> wargfx::Result<()> {
    let palette = archive.palette(era)?;
    let mut image = RgbaImage::new(16, 16);
    for (i, color) in palette.iter().enumerate() {
        image.put_pixel((i % 16) as u32, (i / 16) as u32, *color);
    }
    let path = out.join(format!("palette_{era}.png"));
    save_png(&image, &path)?;
    println!("Wrote {path:?}");
    Ok(())
}

#[derive(Serialize)]
struct TileRecord {
    code: u16,
    filename: String,
}

fn cmd_tileset(archive: &Archive, era: Era, out: &Path) -> wargfx::Result<()> {
    let tileset = Tileset::open(archive, era)?;
    let mut records = Vec::new();
    let mut save_error = None;

    tileset.decode_all(|code, image| {
        if save_error.is_some() {
            return;
        }
        let filename = format!("tile_{code:04x}.png");
        if let Err(e) = save_png(&image, &out.join(&filename)) {
            save_error = Some(e);
            return;
        }
        records.push(TileRecord { code, filename });
    })?;
    if let Some(e) = save_error {
        return Err(e);
    }

    write_json(&records, &out.join("tiles.json"))?;
    println!("Wrote {} tiles for era {era:?}", records.len());
    Ok(())
}

#[derive(Serialize)]
struct FrameRecord {
    index: usize,
    x: u8,
    y: u8,
    width: u8,
    height: u8,
    filename: String,
}

fn cmd_sprite(
    archive: &Archive,
    object: Option<u16>,
    entry: Option<usize>,
    era: Era,
    color: PlayerColor,
    out: &Path,
) -> wargfx::Result<()> {
    let mut frames = Vec::new();
    let mut collect = |frame: SpriteFrame| frames.push(frame);

    match (object, entry) {
        (Some(object), None) => {
            sprite::decode_sprite(archive, color, era, object, Some(&mut collect))?;
        }
        (None, Some(entry)) => {
            sprite::decode_sprite_raw(archive, color, entry, Some(&mut collect))?;
        }
        _ => {
            eprintln!("specify exactly one of --object or --entry");
            return Ok(());
        }
    }

    let mut records = Vec::new();
    for frame in &frames {
        let filename = format!("frame_{:03}.png", frame.index);
        save_png(&frame.image, &out.join(&filename))?;
        records.push(FrameRecord {
            index: frame.index,
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: frame.height,
            filename,
        });
    }
    write_json(&records, &out.join("frames.json"))?;
    println!("Wrote {} frames", records.len());
    Ok(())
}

#[derive(Serialize)]
struct GlyphRecord {
    ch: u8,
    width: u8,
    height: u8,
    x_offset: u8,
    y_offset: u8,
    filename: Option<String>,
}

struct GlyphWriter<'a> {
    out: &'a Path,
    records: Vec<GlyphRecord>,
    error: Option<wargfx::Error>,
}

impl FontSink for GlyphWriter<'_> {
    fn glyph(&mut self, glyph: FontGlyph) {
        if self.error.is_some() {
            return;
        }
        let filename = format!("glyph_{:02x}.png", glyph.ch);
        if let Err(e) = save_png(&glyph.image, &self.out.join(&filename)) {
            self.error = Some(e);
            return;
        }
        self.records.push(GlyphRecord {
            ch: glyph.ch,
            width: glyph.width,
            height: glyph.height,
            x_offset: glyph.x_offset,
            y_offset: glyph.y_offset,
            filename: Some(filename),
        });
    }

    fn empty_glyph(&mut self, ch: u8) {
        self.records.push(GlyphRecord {
            ch,
            width: 0,
            height: 0,
            x_offset: 0,
            y_offset: 0,
            filename: None,
        });
    }
}

fn cmd_font(archive: &Archive, id: usize, out: &Path) -> wargfx::Result<()> {
    let mut writer = GlyphWriter {
        out,
        records: Vec::new(),
        error: None,
    };
    let info = font::decode_font(archive, id, &mut writer)?;
    if let Some(e) = writer.error {
        return Err(e);
    }

    write_json(&writer.records, &out.join("glyphs.json"))?;
    println!(
        "Wrote font {id}: glyphs {:#04x}..{:#04x}, max {}x{}",
        info.first, info.last, info.max_width, info.max_height
    );
    Ok(())
}

fn save_png(image: &RgbaImage, path: &Path) -> wargfx::Result<()> {
    image
        .save(path)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(())
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> wargfx::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)?;
    Ok(())
}
