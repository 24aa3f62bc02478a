//! Frame buffer objects.
//!
//! A `FrameBuffer` is either the default back buffer (id 0, zero targets)
//! or an offscreen set of color attachments plus an optional depth
//! attachment; the two are mutually exclusive by construction. Binds are
//! elided against the context-wide trackers so binding the same target
//! every frame costs nothing.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::context::Context;
use crate::errors::{Error, Result};
use crate::texture::Texture;
use crate::MAX_COLOR_TARGETS;

pub struct FrameBuffer {
    ctx: Context,
    /// Native frame buffer id. 0 indicates the default back buffer.
    id: u32,
    targets: SmallVec<[Rc<Texture>; MAX_COLOR_TARGETS]>,
    depth_target: Option<Rc<Texture>>,
}

impl FrameBuffer {
    /// Returns a frame buffer wrapping the default back buffer.
    pub fn back_buffer(ctx: &Context) -> Rc<Self> {
        Rc::new(FrameBuffer {
            ctx: ctx.clone(),
            id: 0,
            targets: SmallVec::new(),
            depth_target: None,
        })
    }

    /// Creates a frame buffer with the given color targets and optional
    /// depth target, retaining shared ownership of each for at least the
    /// frame buffer's own lifetime.
    pub fn with_targets(
        ctx: &Context,
        targets: Vec<Rc<Texture>>,
        depth_target: Option<Rc<Texture>>,
    ) -> Result<Rc<Self>> {
        if targets.len() > MAX_COLOR_TARGETS {
            return Err(Error::TooManyColorTargets(MAX_COLOR_TARGETS));
        }

        for target in &targets {
            if !target.format().is_color() {
                return Err(Error::NotColorFormat(target.format()));
            }
        }

        if let Some(ref depth) = depth_target {
            if depth.format().is_color() {
                return Err(Error::NotDepthFormat(depth.format()));
            }
        }

        let mut shared = ctx.shared();
        let id = shared.device.create_frame_buffer()?;
        debug!("Creating frame buffer {} with {} color target(s).", id, targets.len());

        let attach = |shared: &mut crate::context::ContextShared| -> Result<()> {
            shared.device.bind_frame_buffer(id)?;
            for (i, target) in targets.iter().enumerate() {
                shared.device.attach_color_target(i, target.id())?;
            }
            if let Some(ref depth) = depth_target {
                shared.device.attach_depth_target(depth.id())?;
            }
            shared.device.check_frame_buffer()
        };

        if let Err(err) = attach(&mut *shared) {
            // Never hand out a partially constructed frame buffer.
            let _ = shared.device.bind_frame_buffer(0);
            let _ = shared.device.delete_frame_buffer(id);
            shared.bound_frame_buffer = 0;
            return Err(err);
        }

        shared.device.bind_frame_buffer(0)?;
        shared.bound_frame_buffer = 0;
        drop(shared);

        Ok(Rc::new(FrameBuffer {
            ctx: ctx.clone(),
            id,
            targets: targets.into_iter().collect(),
            depth_target,
        }))
    }

    /// Creates a frame buffer with no targets assigned yet, for repeatedly
    /// rebinding different single targets via `bind_target`.
    pub fn empty(ctx: &Context) -> Result<Rc<Self>> {
        let id = ctx.shared().device.create_frame_buffer()?;
        debug!("Created empty frame buffer {}.", id);

        Ok(Rc::new(FrameBuffer {
            ctx: ctx.clone(),
            id,
            targets: SmallVec::new(),
            depth_target: None,
        }))
    }

    /// Makes this frame buffer current, skipping the native bind when it
    /// already is.
    pub fn bind(&self) -> Result<()> {
        let mut shared = self.ctx.shared();
        if shared.bound_frame_buffer == self.id {
            trace!("Ignoring redundant frame buffer bind ({}).", self.id);
            return Ok(());
        }

        shared.device.bind_frame_buffer(self.id)?;
        shared.bound_frame_buffer = self.id;
        Ok(())
    }

    /// Binds this frame buffer and selects `target` as the active color
    /// attachment if it differs from the one currently attached.
    pub fn bind_target(&self, target: &Rc<Texture>) -> Result<()> {
        assert!(
            self.id != 0,
            "The back buffer can not take a color target."
        );

        let mut shared = self.ctx.shared();
        if shared.bound_frame_buffer != self.id {
            shared.device.bind_frame_buffer(self.id)?;
            shared.bound_frame_buffer = self.id;
        }

        if shared.bound_color_target != target.id() {
            shared.device.attach_color_target(0, target.id())?;
            shared.bound_color_target = target.id();
        } else {
            trace!("Ignoring redundant color target bind ({}).", target.id());
        }

        Ok(())
    }

    /// Native frame buffer id. 0 indicates the back buffer.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The number of color targets attached; 0 for the back buffer.
    #[inline]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn targets(&self) -> &[Rc<Texture>] {
        &self.targets
    }

    #[inline]
    pub fn depth_target(&self) -> Option<&Rc<Texture>> {
        self.depth_target.as_ref()
    }
}

impl Drop for FrameBuffer {
    fn drop(&mut self) {
        // The back buffer is not ours to delete.
        if self.id == 0 {
            return;
        }

        let mut shared = self.ctx.shared();
        // Deleting the bound frame buffer reverts the native binding to the
        // default one, so only the trackers need updating here.
        if shared.bound_frame_buffer == self.id {
            shared.bound_frame_buffer = 0;
            shared.bound_color_target = 0;
        }

        if let Err(err) = shared.device.delete_frame_buffer(self.id) {
            warn!("Failed to release frame buffer {}: {}", self.id, err);
        }
    }
}
