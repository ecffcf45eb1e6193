/*!
    SDL2 window and YUV texture upload.
*/

use sdl2::VideoSubsystem;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Texture, TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;

use media_types::{PixelFormat, PlaneLayout};

use crate::error::{PlayerError, PlayerResult};

/**
    Largest even size not exceeding `width`x`height`.

    SDL only accepts planar YUV uploads with even dimensions.
*/
pub fn display_size(width: u32, height: u32) -> (u32, u32) {
    ((width & !1).max(2), (height & !1).max(2))
}

/**
    A window with an accelerated renderer.

    Textures created by [`presenter`](Self::presenter) borrow the display,
    so they are always released before the renderer and window.
*/
pub struct SdlDisplay {
    creator: TextureCreator<WindowContext>,
    canvas: WindowCanvas,
    width: u32,
    height: u32,
}

impl SdlDisplay {
    /**
        Open a centered window sized for a `width`x`height` picture.
        Both dimensions must be even.
    */
    pub fn open(video: &VideoSubsystem, title: &str, width: u32, height: u32) -> PlayerResult<Self> {
        let window = video
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| PlayerError::DisplayInit(format!("failed to create window: {e}")))?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| PlayerError::DisplayInit(format!("failed to create renderer: {e}")))?;
        let creator = canvas.texture_creator();

        tracing::debug!(width, height, "opened window");
        Ok(Self {
            creator,
            canvas,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /**
        Create the streaming YUV texture pictures are uploaded to.
    */
    pub fn presenter(&mut self) -> PlayerResult<SdlPresenter<'_>> {
        let texture = self
            .creator
            .create_texture_streaming(PixelFormatEnum::IYUV, self.width, self.height)
            .map_err(|e| PlayerError::DisplayInit(format!("failed to create texture: {e}")))?;

        Ok(SdlPresenter {
            texture,
            canvas: &mut self.canvas,
            planes: PixelFormat::Yuv420p.planes(self.width, self.height),
        })
    }
}

/**
    Uploads packed planar YUV 4:2:0 pictures and presents them.
*/
pub struct SdlPresenter<'a> {
    texture: Texture<'a>,
    canvas: &'a mut WindowCanvas,
    planes: Vec<PlaneLayout>,
}

impl SdlPresenter<'_> {
    /**
        Upload one picture laid out as `PixelFormat::Yuv420p` at the
        display size, then present it scaled to the window.
    */
    pub fn present(&mut self, picture: &[u8]) -> PlayerResult<()> {
        let [y, u, v] = self.planes[..] else {
            return Err(PlayerError::Present("unexpected plane layout".into()));
        };
        let plane = |layout: PlaneLayout| {
            picture.get(layout.range()).ok_or_else(|| {
                PlayerError::Present(format!(
                    "picture of {} bytes is too short for plane ending at {}",
                    picture.len(),
                    layout.range().end
                ))
            })
        };

        self.texture
            .update_yuv(
                None,
                plane(y)?,
                y.row_bytes,
                plane(u)?,
                u.row_bytes,
                plane(v)?,
                v.row_bytes,
            )
            .map_err(|e| PlayerError::Present(e.to_string()))?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, None)
            .map_err(PlayerError::Present)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_size_is_even() {
        assert_eq!(display_size(1920, 1080), (1920, 1080));
        assert_eq!(display_size(641, 361), (640, 360));
        assert_eq!(display_size(1, 1), (2, 2));
    }
}
