//! Brush stamps composited into splatmaps
//!
//! A stamp reads a base layer and writes the composited result into a target
//! buffer of the same shape. Canvases always hand in a snapshot of their own
//! texels as the base, so a stamp never reads what it has just written.

use glam::Vec2;
use surface_chain_config::BrushConfig;
use tracing::trace;

use crate::texels::TexelBuffer;

/// Texture-space compositing primitive
pub trait BrushStamp: Send + Sync {
    /// Composite the stamp onto `base`, writing every texel of `target`.
    ///
    /// # Arguments
    /// * `base` - Layer read by the stamp (same shape as `target`)
    /// * `target` - Buffer receiving the result
    /// * `center` - Stamp centre in the target's UV space
    /// * `size` - Stamp radius in UV units
    fn composite(&self, base: &TexelBuffer, target: &mut TexelBuffer, center: Vec2, size: f32);
}

/// Round displacement brush with a smoothed rim.
///
/// Inside the stamp every channel is raised by `strength * falloff`. The rim
/// band where the falloff eases to zero is `smooth` world units wide, kept in
/// proportion to the brush size so it scales with the stamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialBrush {
    /// Amount added at full falloff
    pub strength: f32,
    /// Rim width as a fraction of the radius (0 = hard stamp)
    pub smooth_fraction: f32,
}

impl Default for RadialBrush {
    fn default() -> Self {
        Self::from_config(&BrushConfig::default())
    }
}

impl RadialBrush {
    pub fn new(strength: f32, smooth_fraction: f32) -> Self {
        Self {
            strength,
            smooth_fraction: smooth_fraction.clamp(0.0, 1.0),
        }
    }

    /// Build the brush from the shared brush parameters
    pub fn from_config(config: &BrushConfig) -> Self {
        let fraction = if config.size > 0.0 {
            config.smooth / config.size
        } else {
            0.0
        };
        Self::new(config.strength, fraction)
    }
}

impl BrushStamp for RadialBrush {
    fn composite(&self, base: &TexelBuffer, target: &mut TexelBuffer, center: Vec2, size: f32) {
        target.copy_from(base);

        if size <= 0.0 || self.strength == 0.0 {
            return;
        }

        // Texel range covered by the stamp, clamped to the buffer
        let lo = base.uv_to_texel(center - Vec2::splat(size));
        let hi = base.uv_to_texel(center + Vec2::splat(size));
        let x_min = (lo.x.floor().max(0.0) as u32).min(base.width);
        let y_min = (lo.y.floor().max(0.0) as u32).min(base.height);
        let x_max = (hi.x.ceil().max(0.0) as u32).min(base.width);
        let y_max = (hi.y.ceil().max(0.0) as u32).min(base.height);

        if x_min >= x_max || y_min >= y_max {
            trace!("RadialBrush::composite: stamp outside buffer");
            return;
        }

        let rim = size * self.smooth_fraction;
        for y in y_min..y_max {
            for x in x_min..x_max {
                let distance = base.texel_center_uv(x, y).distance(center);
                let falloff = smoothed_falloff(distance, size, rim);
                if falloff <= 0.0 {
                    continue;
                }

                let Some(texel) = base.get(x, y) else {
                    continue;
                };
                let amount = self.strength * falloff;
                // At most four channels
                let mut out = [0.0f32; 4];
                for (slot, value) in out.iter_mut().zip(texel) {
                    *slot = value + amount;
                }
                target.set(x, y, &out[..texel.len()]);
            }
        }
    }
}

/// Falloff of a round stamp.
/// 1.0 inside `radius - rim`, easing to 0.0 at `radius`, 0.0 beyond
#[inline]
pub fn smoothed_falloff(distance: f32, radius: f32, rim: f32) -> f32 {
    if distance > radius {
        return 0.0;
    }
    if rim <= 0.0 {
        return 1.0;
    }
    let t = ((radius - distance) / rim).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use surface_chain_config::TexelFormat;

    #[test]
    fn test_falloff_hard() {
        assert_eq!(smoothed_falloff(0.0, 1.0, 0.0), 1.0);
        assert_eq!(smoothed_falloff(1.0, 1.0, 0.0), 1.0);
        assert_eq!(smoothed_falloff(1.01, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_falloff_rim() {
        assert_eq!(smoothed_falloff(0.2, 1.0, 0.5), 1.0);
        assert_eq!(smoothed_falloff(1.0, 1.0, 0.5), 0.0);
        let mid = smoothed_falloff(0.75, 1.0, 0.5);
        assert!((mid - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_from_config() {
        let brush = RadialBrush::from_config(&BrushConfig {
            size: 4.0,
            smooth: 1.0,
            strength: 0.5,
        });
        assert_eq!(brush.strength, 0.5);
        assert!((brush.smooth_fraction - 0.25).abs() < 1e-6);

        let wide = RadialBrush::from_config(&BrushConfig {
            size: 1.0,
            smooth: 5.0,
            strength: 1.0,
        });
        assert_eq!(wide.smooth_fraction, 1.0);
    }

    #[test]
    fn test_composite_center() {
        let base = TexelBuffer::new(8, 8, TexelFormat::RFloat);
        let mut target = TexelBuffer::new(8, 8, TexelFormat::RFloat);
        let brush = RadialBrush::new(1.0, 0.0);

        brush.composite(&base, &mut target, Vec2::splat(0.5), 0.2);

        // Texels around the centre are raised, corners untouched
        assert_eq!(target.value(3, 3), Some(1.0));
        assert_eq!(target.value(4, 4), Some(1.0));
        assert_eq!(target.value(0, 0), Some(0.0));
        assert_eq!(target.value(7, 7), Some(0.0));
    }

    #[test]
    fn test_composite_reads_base() {
        let mut base = TexelBuffer::new(4, 4, TexelFormat::RFloat);
        base.fill(2.0);
        let mut target = TexelBuffer::new(4, 4, TexelFormat::RFloat);
        let brush = RadialBrush::new(0.5, 0.0);

        brush.composite(&base, &mut target, Vec2::splat(0.5), 0.2);

        // Untouched texels carry the base, stamped ones add to it
        assert_eq!(target.value(0, 0), Some(2.0));
        assert_eq!(target.value(1, 1), Some(2.5));
    }

    #[test]
    fn test_composite_outside() {
        let base = TexelBuffer::new(4, 4, TexelFormat::R8);
        let mut target = TexelBuffer::new(4, 4, TexelFormat::R8);
        target.fill(0.7);
        RadialBrush::new(1.0, 0.0).composite(&base, &mut target, Vec2::new(3.0, 3.0), 0.1);

        // Target still receives the base even when the stamp misses
        assert_eq!(target.total(), 0.0);
    }

    #[test]
    fn test_composite_all_channels() {
        let base = TexelBuffer::new(4, 4, TexelFormat::Rgba8);
        let mut target = TexelBuffer::new(4, 4, TexelFormat::Rgba8);
        RadialBrush::new(0.25, 0.0).composite(&base, &mut target, Vec2::splat(0.5), 0.3);

        assert_eq!(target.get(1, 1), Some(&[0.25, 0.25, 0.25, 0.25][..]));
    }
}
