//! Observation policy: how far ahead of visibility a load fires.

use crate::Rect;

/// Margin / threshold configuration for one watcher.
///
/// The two common policies are presets of the same mechanism:
/// [`preload_margin`](Self::preload_margin) fires well before the element is
/// on screen, [`just_in_time`](Self::just_in_time) waits until it is fully
/// visible.
///
/// Values are not validated. `root_margin` must be valid CSS margin
/// shorthand and `threshold` must lie in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct WatchOptions {
    /// Margin around the viewport, e.g. `"600px 0px"`.
    pub root_margin: String,
    /// Visible fraction of the element required to count as intersecting.
    /// Must lie in `[0, 1]`; out-of-range values are passed through as is.
    pub threshold: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            root_margin: "0px".into(),
            threshold: 0.0,
        }
    }
}

impl WatchOptions {
    pub fn new(root_margin: impl Into<String>, threshold: f64) -> Self {
        Self {
            root_margin: root_margin.into(),
            threshold,
        }
    }

    /// Loads 600px before the element scrolls in, on any overlap.
    pub fn preload_margin() -> Self {
        Self::new("600px 0px", 0.0)
    }

    /// Loads only once the element is entirely inside the viewport.
    pub fn just_in_time() -> Self {
        Self::new("0px", 1.0)
    }

    pub fn with_root_margin(mut self, root_margin: impl Into<String>) -> Self {
        self.root_margin = root_margin.into();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Parsed form of [`root_margin`](Self::root_margin), if it parses.
    pub fn parsed_root_margin(&self) -> Option<RootMargin> {
        RootMargin::parse(&self.root_margin)
    }
}

/// A single margin length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f64),
    /// Percentage of the root's width (horizontal) or height (vertical).
    Percent(f64),
}

impl Length {
    fn parse(token: &str) -> Option<Self> {
        if let Some(value) = token.strip_suffix("px") {
            return value.parse().ok().map(Length::Px);
        }
        if let Some(value) = token.strip_suffix('%') {
            return value.parse().ok().map(Length::Percent);
        }
        // Unitless zero is the only unitless length CSS accepts.
        match token.parse::<f64>() {
            Ok(value) if value == 0.0 => Some(Length::Px(0.0)),
            _ => None,
        }
    }

    fn resolve(self, basis: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }
}

/// Root margin in CSS shorthand order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    pub const ZERO: Self = Self {
        top: Length::Px(0.0),
        right: Length::Px(0.0),
        bottom: Length::Px(0.0),
        left: Length::Px(0.0),
    };

    /// Parses one to four whitespace separated `px` / `%` lengths.
    pub fn parse(input: &str) -> Option<Self> {
        let lengths = input
            .split_whitespace()
            .map(Length::parse)
            .collect::<Option<Vec<_>>>()?;
        let (top, right, bottom, left) = match lengths.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => return None,
        };
        Some(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Grows (or shrinks, for negative margins) `root` by this margin.
    pub fn expand(&self, root: &Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        Rect::new(
            root.x - left,
            root.y - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let preload = WatchOptions::preload_margin();
        assert_eq!(preload.root_margin, "600px 0px");
        assert_eq!(preload.threshold, 0.0);

        let strict = WatchOptions::just_in_time();
        assert_eq!(strict.root_margin, "0px");
        assert_eq!(strict.threshold, 1.0);

        assert_eq!(WatchOptions::default().root_margin, "0px");
    }

    #[test]
    fn threshold_is_not_range_checked() {
        let options = WatchOptions::new("0px", 1.5).with_threshold(-0.25);
        assert_eq!(options.threshold, -0.25);
        assert_eq!(WatchOptions::new("0px", 1.5).threshold, 1.5);
    }

    #[test]
    fn shorthand_expansion() {
        let two = RootMargin::parse("600px 0px").unwrap();
        assert_eq!(two.top, Length::Px(600.0));
        assert_eq!(two.bottom, Length::Px(600.0));
        assert_eq!(two.left, Length::Px(0.0));

        let three = RootMargin::parse("1px 2px 3px").unwrap();
        assert_eq!(three.left, Length::Px(2.0));
        assert_eq!(three.bottom, Length::Px(3.0));

        let four = RootMargin::parse("1px 2% 3px 4px").unwrap();
        assert_eq!(four.right, Length::Percent(2.0));
        assert_eq!(four.left, Length::Px(4.0));

        assert_eq!(RootMargin::parse("0"), Some(RootMargin::ZERO));
    }

    #[test]
    fn rejects_malformed_margins() {
        assert!(RootMargin::parse("").is_none());
        assert!(RootMargin::parse("10em").is_none());
        assert!(RootMargin::parse("5").is_none());
        assert!(RootMargin::parse("1px 1px 1px 1px 1px").is_none());
    }

    #[test]
    fn expand_mixes_pixels_and_percent() {
        let margin = RootMargin::parse("600px 10%").unwrap();
        let expanded = margin.expand(&Rect::new(0.0, 0.0, 400.0, 600.0));
        assert_eq!(expanded, Rect::new(-40.0, -600.0, 480.0, 1800.0));
    }
}
