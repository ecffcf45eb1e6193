use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use media_decode::{DecoderConfig, MediaDecoder};
use media_export::{ExportSummary, JpegExportConfig};
use vidplayer::{Player, PlayerConfig};

#[derive(Parser, Debug)]
#[command(name = "vidplayer")]
#[command(about = "Play a video file or export its frames")]
struct Args {
    /// Decoder threads (0 = one per core)
    #[arg(long, global = true, default_value = "0")]
    threads: usize,

    /// Print the container's format information when opening it
    #[arg(long, global = true)]
    dump_format: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a file in a window
    Play {
        input: PathBuf,

        /// Do not play the audio stream
        #[arg(long)]
        no_audio: bool,

        /// Restart from the beginning at end of stream
        #[arg(long = "loop")]
        looping: bool,

        /// Window title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,
    },
    /// Write every Nth frame as a JPEG image
    Jpeg {
        input: PathBuf,
        dir: PathBuf,

        /// Write one image every N frames
        #[arg(long, default_value = "100")]
        every: u64,

        /// JPEG quality (1-100)
        #[arg(long, default_value = "80")]
        quality: u8,
    },
    /// Dump decoded frames as raw planar YUV 4:2:0
    Yuv { input: PathBuf, output: PathBuf },
    /// Copy the video stream into a new container without re-encoding
    Remux { input: PathBuf, output: PathBuf },
    /// Print the selected stream parameters
    Info { input: PathBuf },
}

impl Command {
    /// Whether the audio stream should be opened alongside the video.
    fn wants_audio(&self) -> bool {
        match self {
            Self::Play { no_audio, .. } => !no_audio,
            Self::Info { .. } => true,
            Self::Jpeg { .. } | Self::Yuv { .. } | Self::Remux { .. } => false,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = DecoderConfig::new()
        .with_threads(args.threads)
        .with_format_dump(args.dump_format)
        .with_audio(args.command.wants_audio());

    match args.command {
        Command::Play {
            input,
            no_audio,
            looping,
            title,
        } => {
            let decoder = open(&input, config)?;
            let title = title.unwrap_or_else(|| file_title(&input));
            let config = PlayerConfig::new()
                .with_title(title)
                .with_audio(!no_audio)
                .with_looping(looping);

            let mut player = Player::initialize(decoder, config)?;
            player.play()?;
        }
        Command::Jpeg {
            input,
            dir,
            every,
            quality,
        } => {
            let mut decoder = open(&input, config)?;
            let export = JpegExportConfig::new(dir)
                .with_every(every)
                .with_quality(quality);
            let summary = media_export::export_jpeg(&mut decoder, &export)?;
            report("jpeg", &summary);
        }
        Command::Yuv { input, output } => {
            let mut decoder = open(&input, config)?;
            let summary = media_export::export_yuv420(&mut decoder, &output)?;
            report("yuv", &summary);
        }
        Command::Remux { input, output } => {
            let mut decoder = open(&input, config)?;
            let summary = media_export::export_stream_copy(&mut decoder, &output)?;
            report("remux", &summary);
        }
        Command::Info { input } => {
            let decoder = open(&input, config)?;
            print_info(&decoder);
        }
    }

    Ok(())
}

fn open(path: &Path, config: DecoderConfig) -> Result<MediaDecoder> {
    MediaDecoder::open(path, &config).with_context(|| format!("failed to open {}", path.display()))
}

fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("vidplayer"))
}

fn report(mode: &str, summary: &ExportSummary) {
    println!(
        "{mode}: read {} frames, wrote {} ({} bytes), skipped {}",
        summary.frames_read, summary.frames_written, summary.bytes_written, summary.frames_skipped
    );
}

fn print_info(decoder: &MediaDecoder) {
    let video = decoder.video();
    println!("file:      {}", decoder.path().display());
    if let Some(duration) = decoder.duration() {
        println!("duration:  {:.3}s", duration.as_secs_f64());
    }
    println!(
        "video:     #{} {} {}x{} {:?}",
        video.stream_index, video.codec_name, video.width, video.height, video.format
    );
    if let Some(rate) = video.frame_rate {
        println!("frame rate: {rate}");
    }
    if video.frame_count > 0 {
        println!("frames:    {}", video.frame_count);
    }
    match decoder.audio() {
        Some(audio) => println!(
            "audio:     #{} {:?} {} ch @ {} Hz",
            audio.stream_index, audio.format, audio.channels, audio.rate
        ),
        None => println!("audio:     none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> Command {
        Args::try_parse_from(std::iter::once("vidplayer").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn audio_is_opened_where_it_is_used() {
        assert!(command(&["info", "in.mp4"]).wants_audio());
        assert!(command(&["play", "in.mp4"]).wants_audio());
        assert!(!command(&["play", "--no-audio", "in.mp4"]).wants_audio());
        assert!(!command(&["jpeg", "in.mp4", "out"]).wants_audio());
        assert!(!command(&["yuv", "in.mp4", "out.yuv"]).wants_audio());
        assert!(!command(&["remux", "in.mp4", "out.mkv"]).wants_audio());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let args = Args::try_parse_from(["vidplayer", "info", "in.mp4", "--threads", "2"]).unwrap();
        assert_eq!(args.threads, 2);
        assert!(!args.dump_format);
    }
}
