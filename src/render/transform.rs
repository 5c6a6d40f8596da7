use crate::state::record::Position;

/// Court bounds used when there is no finite shot position to fit.
pub const FALLBACK_X_DOMAIN: (f64, f64) = (-25.0, 25.0);
pub const FALLBACK_Y_DOMAIN: (f64, f64) = (-5.25, 41.75);

/// Fraction of the data span added on each side of a fitted domain.
const DOMAIN_PADDING: f64 = 0.05;

/// Linear map from a data interval onto a pixel interval. The range may be
/// reversed (`r0 > r1`) for inverted axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() < 1e-15 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span.abs() < 1e-15 {
            return (d0 + d1) / 2.0;
        }
        d0 + (pixel - r0) / span * (d1 - d0)
    }
}

/// Finite min/max of a set of values, padded on both sides.
fn padded_extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let pad = (max - min) * DOMAIN_PADDING;
    let pad = if pad.abs() < 1e-15 { 0.5 } else { pad };
    Some((min - pad, max + pad))
}

/// Fixed data-to-surface mapping, fit once when the chart is mounted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainScale {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl DomainScale {
    /// Fit both axes to the finite shot positions. The y range is inverted
    /// so that deeper shots sit higher on screen.
    pub fn fit(positions: &[Position], width: f64, height: f64) -> Self {
        let x_domain = padded_extent(positions.iter().filter(|p| p.is_finite()).map(|p| p.x))
            .unwrap_or(FALLBACK_X_DOMAIN);
        let y_domain = padded_extent(positions.iter().filter(|p| p.is_finite()).map(|p| p.y))
            .unwrap_or(FALLBACK_Y_DOMAIN);
        Self {
            x: LinearScale::new(x_domain, (0.0, width)),
            y: LinearScale::new(y_domain, (height, 0.0)),
        }
    }

    pub fn apply(&self, p: Position) -> [f64; 2] {
        [self.x.apply(p.x), self.y.apply(p.y)]
    }

    pub fn invert(&self, px: [f64; 2]) -> Position {
        Position::new(self.x.invert(px[0]), self.y.invert(px[1]))
    }
}

/// Uniform scale plus translation applied on top of the domain scale:
/// `p -> k * p + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self { k: 1.0, tx: 0.0, ty: 0.0 };

    pub fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        [p[0] * self.k + self.tx, p[1] * self.k + self.ty]
    }

    pub fn invert(&self, p: [f64; 2]) -> [f64; 2] {
        [(p[0] - self.tx) / self.k, (p[1] - self.ty) / self.k]
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { k: self.k, tx: self.tx + dx, ty: self.ty + dy }
    }

    /// Scale by `factor` keeping the surface point `focal` fixed. The
    /// resulting scale is clamped to `extent`.
    pub fn scaled_about(&self, focal: [f64; 2], factor: f64, extent: [f64; 2]) -> Self {
        let k = (self.k * factor).clamp(extent[0], extent[1]);
        let ratio = k / self.k;
        Self {
            k,
            tx: focal[0] - (focal[0] - self.tx) * ratio,
            ty: focal[1] - (focal[1] - self.ty) * ratio,
        }
    }
}

/// Domain scale composed with the zoom transform. One pipeline per chart;
/// the court layer and the shot layer both project through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatePipeline {
    domain: DomainScale,
    zoom: ZoomTransform,
    zoom_extent: [f64; 2],
}

impl CoordinatePipeline {
    pub fn new(domain: DomainScale, zoom_extent: [f64; 2]) -> Self {
        Self {
            domain,
            zoom: ZoomTransform::IDENTITY,
            zoom_extent,
        }
    }

    pub fn domain(&self) -> &DomainScale {
        &self.domain
    }

    pub fn zoom(&self) -> ZoomTransform {
        self.zoom
    }

    /// Surface-local pixel position of a data point.
    pub fn to_screen(&self, p: Position) -> [f64; 2] {
        self.zoom.apply(self.domain.apply(p))
    }

    pub fn to_data(&self, px: [f64; 2]) -> Position {
        self.domain.invert(self.zoom.invert(px))
    }

    pub fn set_zoom(&mut self, zoom: ZoomTransform) -> bool {
        let k = zoom.k.clamp(self.zoom_extent[0], self.zoom_extent[1]);
        let zoom = ZoomTransform { k, ..zoom };
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        true
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        self.set_zoom(self.zoom.translated(dx, dy))
    }

    pub fn zoom_about(&mut self, focal: [f64; 2], factor: f64) -> bool {
        self.set_zoom(self.zoom.scaled_about(focal, factor, self.zoom_extent))
    }

    pub fn reset_zoom(&mut self) -> bool {
        self.set_zoom(ZoomTransform::IDENTITY)
    }
}

/// Zoom gesture decoded from one frame of pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomGesture {
    Pan { dx: f64, dy: f64 },
    Wheel { focal: [f64; 2], factor: f64 },
    Reset,
}

/// Read drag, wheel and double-click input over the scatter surface.
pub fn read_zoom_gestures(response: &egui::Response, rect: egui::Rect) -> Vec<ZoomGesture> {
    let mut gestures = Vec::new();

    // Pan: drag with primary mouse button
    if response.dragged_by(egui::PointerButton::Primary) {
        let delta = response.drag_delta();
        if delta != egui::Vec2::ZERO {
            gestures.push(ZoomGesture::Pan { dx: delta.x as f64, dy: delta.y as f64 });
        }
    }

    // Zoom: scroll wheel, centered on mouse position
    let scroll_delta = response.ctx.input(|i| {
        if response.hovered() {
            i.smooth_scroll_delta.y
        } else {
            0.0
        }
    });
    if scroll_delta.abs() > 0.0 {
        if let Some(mouse_pos) = response.hover_pos() {
            let factor = (1.0 + (scroll_delta as f64) * 0.002).clamp(0.5, 2.0);
            let local = mouse_pos - rect.min;
            gestures.push(ZoomGesture::Wheel {
                focal: [local.x as f64, local.y as f64],
                factor,
            });
        }
    }

    if response.double_clicked() {
        gestures.push(ZoomGesture::Reset);
    }
    gestures
}
