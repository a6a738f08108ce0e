//! Interactive rendering with an asynchronous logo decode.
//!
//! Every [`RenderSession::begin`] call starts a new generation. The base
//! raster is drawn right away; the logo is decoded on a worker thread and
//! composited when the ticket is completed. A ticket whose generation has
//! been superseded completes as [`Completion::Stale`] and leaves the session
//! untouched, so a slow decode can never overwrite a newer render.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use image::RgbaImage;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::logo::LogoImage;
use crate::pipeline::Prepared;
use crate::raster::RasterSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStatus {
    #[default]
    Idle,
    Generating,
    Loaded,
}

/// A finished raster and the generation that produced it.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub image: RgbaImage,
    pub generation: u64,
    pub logo_applied: bool,
}

#[derive(Debug)]
pub enum Completion {
    Finished(RenderedImage),
    Stale,
}

#[derive(Debug)]
pub enum Poll {
    Ready(Completion),
    Pending(PendingRender),
}

/// A render whose base layers are drawn and whose logo may still be decoding.
pub struct PendingRender {
    generation: u64,
    prepared: Prepared,
    surface: RasterSurface,
    logo: Option<Receiver<Option<LogoImage>>>,
}

impl PendingRender {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Debug for PendingRender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRender")
            .field("generation", &self.generation)
            .field("awaiting_logo", &self.logo.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct RenderSession {
    generation: AtomicU64,
    status: Mutex<RenderStatus>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RenderStatus {
        *self.status.lock()
    }

    /// The generation of the most recent `begin` call.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Starts a new render.
    ///
    /// # Errors
    ///
    /// Returns the encoding or layout error and resets the status to
    /// [`RenderStatus::Idle`] unless a newer render has started.
    pub fn begin(&self, config: &RenderConfig) -> Result<PendingRender> {
        let generation = {
            let mut status = self.status.lock();
            *status = RenderStatus::Generating;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let base = Prepared::new(config).and_then(|prepared| {
            let mut surface = RasterSurface::new(prepared.layout.canvas_size)?;
            prepared.draw_base(&mut surface);
            Ok((prepared, surface))
        });
        let (prepared, surface) = match base {
            Ok(base) => base,
            Err(err) => {
                warn!(generation, %err, "render failed");
                let mut status = self.status.lock();
                if self.generation() == generation {
                    *status = RenderStatus::Idle;
                }
                return Err(err);
            }
        };

        let logo = prepared.config.logo.as_ref().map(|settings| {
            let (tx, rx) = bounded(1);
            let data = settings.data.clone();
            let job = move || {
                let decoded = match LogoImage::decode(data) {
                    Ok(logo) => Some(logo),
                    Err(err) => {
                        warn!(generation, %err, "skipping logo overlay");
                        None
                    }
                };
                // The ticket may have been dropped already.
                let _ = tx.send(decoded);
            };
            let spawned = thread::Builder::new()
                .name(format!("logo-decode-{generation}"))
                .spawn(job);
            if let Err(err) = spawned {
                warn!(%err, "could not spawn logo decoder");
            }
            rx
        });

        debug!(generation, logo = logo.is_some(), "base layers drawn");
        Ok(PendingRender {
            generation,
            prepared,
            surface,
            logo,
        })
    }

    /// Blocks until the logo decode finishes and completes the ticket.
    pub fn complete(&self, pending: PendingRender) -> Completion {
        let logo = pending.logo.as_ref().and_then(|rx| rx.recv().ok().flatten());
        self.finish(pending, logo)
    }

    /// Completes the ticket if its logo decode is done, otherwise hands it
    /// back.
    pub fn try_complete(&self, pending: PendingRender) -> Poll {
        let logo = match &pending.logo {
            None => None,
            Some(rx) => match rx.try_recv() {
                Ok(logo) => logo,
                Err(TryRecvError::Empty) => return Poll::Pending(pending),
                Err(TryRecvError::Disconnected) => None,
            },
        };
        Poll::Ready(self.finish(pending, logo))
    }

    fn finish(&self, pending: PendingRender, logo: Option<LogoImage>) -> Completion {
        let PendingRender {
            generation,
            prepared,
            mut surface,
            ..
        } = pending;
        let logo_applied = logo.is_some();
        if let Some(logo) = &logo {
            prepared.draw_logo(&mut surface, logo);
        }

        // `begin` bumps the generation while holding the status lock.
        let mut status = self.status.lock();
        let latest = self.generation();
        if generation != latest {
            debug!(generation, latest, "discarding stale render");
            return Completion::Stale;
        }
        *status = RenderStatus::Loaded;
        drop(status);

        info!(generation, size = prepared.layout.canvas_size, "render loaded");
        Completion::Finished(RenderedImage {
            image: surface.to_rgba_image(),
            generation,
            logo_applied,
        })
    }
}
