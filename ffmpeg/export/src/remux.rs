/*!
    Video-only stream copy.
*/

use std::path::Path;

use ffmpeg_next::{codec, encoder, format};

use media_decode::{InputSource, MediaDecoder, PacketSource};
use media_types::{Error, Result, StreamKind};

use crate::config::ExportSummary;

/**
    Copy the compressed video stream into a new container at `path`
    without re-encoding. The container format is chosen from the file
    extension; other streams are dropped.
*/
pub fn export_stream_copy(decoder: &mut MediaDecoder, path: &Path) -> Result<ExportSummary> {
    decoder.rewind()?;

    let video_index = decoder.video().stream_index;
    let input_time_base = decoder
        .video_stream()
        .map(|stream| stream.time_base())
        .ok_or(Error::StreamNotFound {
            kind: StreamKind::Video,
        })?;

    let mut output = open_output(path, decoder.video().parameters.clone())?;
    let output_time_base = output
        .stream(0)
        .map(|stream| stream.time_base())
        .ok_or_else(|| Error::export("output stream missing after header"))?;

    let source = decoder.source_mut();
    let mut summary = ExportSummary::default();
    while let Some(mut packet) = source.read_packet()? {
        if InputSource::stream_index(&packet) != video_index {
            continue;
        }
        summary.frames_read += 1;

        let size = packet.size() as u64;
        packet.rescale_ts(input_time_base, output_time_base);
        packet.set_position(-1);
        packet.set_stream(0);
        match packet.write_interleaved(&mut output) {
            Ok(()) => {
                summary.frames_written += 1;
                summary.bytes_written += size;
            }
            Err(e) => {
                tracing::warn!(packet = summary.frames_read - 1, error = %e, "failed to write packet");
                summary.frames_skipped += 1;
            }
        }
    }

    output
        .write_trailer()
        .map_err(|e| Error::export(format!("failed to finalize {}: {e}", path.display())))?;

    tracing::info!(
        path = %path.display(),
        packets = summary.frames_written,
        bytes = summary.bytes_written,
        "stream copy finished"
    );
    Ok(summary)
}

/**
    Create the output container with one stream carrying `parameters`
    and write its header.
*/
fn open_output(path: &Path, parameters: codec::Parameters) -> Result<format::context::Output> {
    let mut output = format::output(&path)
        .map_err(|e| Error::export(format!("failed to create {}: {e}", path.display())))?;

    {
        let mut stream = output
            .add_stream(encoder::find(codec::Id::None))
            .map_err(|e| Error::export(format!("failed to add stream: {e}")))?;
        stream.set_parameters(parameters);
        // Source codec tags are container specific; let the muxer pick one.
        unsafe {
            (*stream.parameters().as_mut_ptr()).codec_tag = 0;
        }
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        let url = path.to_string_lossy();
        format::context::output::dump(&output, 0, Some(&*url));
    }

    output
        .write_header()
        .map_err(|e| Error::export(format!("failed to write header to {}: {e}", path.display())))?;
    Ok(output)
}
