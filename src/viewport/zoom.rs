//! Zoom directives and render scale resolution

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fit modes never magnify beyond this; explicit zoom may
pub const MAX_FIT_SCALE: f64 = 2.0;

/// Fit modes never shrink below this, even for an empty container
pub const MIN_FIT_SCALE: f64 = 0.1;

/// Pixels reserved around the page in each axis
pub const DEFAULT_PADDING_PX: f64 = 64.0;

/// Native page size at scale 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// Space available for the page, net of padding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

/// How the render scale is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DirectiveRepr", into = "DirectiveRepr")]
pub enum ZoomDirective {
    /// Page width fills the container
    #[default]
    FitWidth,
    /// Whole page fits in the container
    FitPage,
    /// Explicit scale factor
    Scale(f64),
}

/// A zoom menu entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLevel {
    pub label: &'static str,
    pub directive: ZoomDirective,
}

/// Zoom menu presets, in display order
pub const ZOOM_LEVELS: [ZoomLevel; 8] = [
    ZoomLevel {
        label: "Fit width",
        directive: ZoomDirective::FitWidth,
    },
    ZoomLevel {
        label: "Fit page",
        directive: ZoomDirective::FitPage,
    },
    ZoomLevel {
        label: "50%",
        directive: ZoomDirective::Scale(0.5),
    },
    ZoomLevel {
        label: "75%",
        directive: ZoomDirective::Scale(0.75),
    },
    ZoomLevel {
        label: "100%",
        directive: ZoomDirective::Scale(1.0),
    },
    ZoomLevel {
        label: "125%",
        directive: ZoomDirective::Scale(1.25),
    },
    ZoomLevel {
        label: "150%",
        directive: ZoomDirective::Scale(1.5),
    },
    ZoomLevel {
        label: "200%",
        directive: ZoomDirective::Scale(2.0),
    },
];

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Measured client size minus `padding` in each axis, floored at zero
    pub fn from_client(client_width: f64, client_height: f64, padding: f64) -> Self {
        Self {
            width: (client_width - padding).max(0.0),
            height: (client_height - padding).max(0.0),
        }
    }
}

/// Render scale for `directive`, with the default fit ceiling
pub fn resolve(directive: ZoomDirective, native: PageSize, container: ContainerSize) -> f64 {
    resolve_with_ceiling(directive, native, container, MAX_FIT_SCALE)
}

/// Render scale for `directive`; fit modes are capped at `ceiling`.
///
/// Fit results are floored at [`MIN_FIT_SCALE`], so a collapsed container
/// or a degenerate native size still yields a positive scale.
pub fn resolve_with_ceiling(
    directive: ZoomDirective,
    native: PageSize,
    container: ContainerSize,
    ceiling: f64,
) -> f64 {
    let fit = match directive {
        ZoomDirective::FitWidth => container.width / native.width,
        ZoomDirective::FitPage => {
            let scale_width = container.width / native.width;
            let scale_height = container.height / native.height;
            scale_width.min(scale_height)
        }
        ZoomDirective::Scale(scale) => return scale,
    };
    // f64::min/max discard NaN, so 0/0 lands on the ceiling
    fit.min(ceiling).max(MIN_FIT_SCALE)
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown zoom directive: {0}")]
pub struct ParseZoomError(String);

impl FromStr for ZoomDirective {
    type Err = ParseZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fit-width" => Ok(ZoomDirective::FitWidth),
            "fit-page" => Ok(ZoomDirective::FitPage),
            other => {
                let number = other.strip_suffix('%');
                let scale = number
                    .unwrap_or(other)
                    .parse::<f64>()
                    .map_err(|_| ParseZoomError(s.to_string()))?;
                let scale = if number.is_some() { scale / 100.0 } else { scale };
                if scale.is_finite() && scale > 0.0 {
                    Ok(ZoomDirective::Scale(scale))
                } else {
                    Err(ParseZoomError(s.to_string()))
                }
            }
        }
    }
}

impl fmt::Display for ZoomDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoomDirective::FitWidth => write!(f, "fit-width"),
            ZoomDirective::FitPage => write!(f, "fit-page"),
            ZoomDirective::Scale(scale) => write!(f, "{}", scale),
        }
    }
}

/// Wire form: the mode token or a bare number
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DirectiveRepr {
    Scale(f64),
    Mode(String),
}

impl TryFrom<DirectiveRepr> for ZoomDirective {
    type Error = ParseZoomError;

    fn try_from(repr: DirectiveRepr) -> Result<Self, Self::Error> {
        match repr {
            DirectiveRepr::Scale(scale) => scale.to_string().parse(),
            DirectiveRepr::Mode(mode) => mode.parse(),
        }
    }
}

impl From<ZoomDirective> for DirectiveRepr {
    fn from(directive: ZoomDirective) -> Self {
        match directive {
            ZoomDirective::Scale(scale) => DirectiveRepr::Scale(scale),
            mode => DirectiveRepr::Mode(mode.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width_uses_width_ratio() {
        let scale = resolve(
            ZoomDirective::FitWidth,
            PageSize::new(600.0, 800.0),
            ContainerSize::new(300.0, 1000.0),
        );
        assert_eq!(scale, 0.5);
    }

    #[test]
    fn test_fit_width_ceiling() {
        let scale = resolve(
            ZoomDirective::FitWidth,
            PageSize::new(100.0, 800.0),
            ContainerSize::new(1000.0, 1000.0),
        );
        assert_eq!(scale, 2.0);
    }

    #[test]
    fn test_fit_page_takes_smaller_ratio() {
        let native = PageSize::new(600.0, 800.0);

        let tall = resolve(ZoomDirective::FitPage, native, ContainerSize::new(900.0, 400.0));
        assert_eq!(tall, 0.5);

        let wide = resolve(ZoomDirective::FitPage, native, ContainerSize::new(300.0, 4000.0));
        assert_eq!(wide, 0.5);

        let huge = resolve(ZoomDirective::FitPage, native, ContainerSize::new(6000.0, 8000.0));
        assert_eq!(huge, 2.0);
    }

    #[test]
    fn test_explicit_scale_is_not_clamped() {
        let scale = resolve(
            ZoomDirective::Scale(3.5),
            PageSize::new(100.0, 100.0),
            ContainerSize::new(10.0, 10.0),
        );
        assert_eq!(scale, 3.5);
    }

    #[test]
    fn test_fit_scale_stays_positive() {
        let native = PageSize::new(600.0, 800.0);
        let collapsed = ContainerSize::from_client(40.0, 40.0, DEFAULT_PADDING_PX);

        assert_eq!(resolve(ZoomDirective::FitWidth, native, collapsed), MIN_FIT_SCALE);
        assert_eq!(resolve(ZoomDirective::FitPage, native, collapsed), MIN_FIT_SCALE);

        let empty_page = PageSize::new(0.0, 0.0);
        let container = ContainerSize::new(300.0, 400.0);
        assert_eq!(resolve(ZoomDirective::FitWidth, empty_page, container), MAX_FIT_SCALE);
        assert_eq!(resolve(ZoomDirective::FitPage, empty_page, collapsed), MAX_FIT_SCALE);
    }

    #[test]
    fn test_container_net_of_padding() {
        let container = ContainerSize::from_client(1064.0, 864.0, DEFAULT_PADDING_PX);
        assert_eq!(container, ContainerSize::new(1000.0, 800.0));

        let cramped = ContainerSize::from_client(40.0, 100.0, DEFAULT_PADDING_PX);
        assert_eq!(cramped.width, 0.0);
    }

    #[test]
    fn test_parse_directive() {
        assert_eq!("fit-width".parse::<ZoomDirective>().unwrap(), ZoomDirective::FitWidth);
        assert_eq!("fit-page".parse::<ZoomDirective>().unwrap(), ZoomDirective::FitPage);
        assert_eq!("1.25".parse::<ZoomDirective>().unwrap(), ZoomDirective::Scale(1.25));
        assert_eq!("150%".parse::<ZoomDirective>().unwrap(), ZoomDirective::Scale(1.5));
        assert!("fit-height".parse::<ZoomDirective>().is_err());
        assert!("0".parse::<ZoomDirective>().is_err());
    }

    #[test]
    fn test_directive_wire_form() {
        assert_eq!(serde_json::to_string(&ZoomDirective::FitPage).unwrap(), "\"fit-page\"");
        assert_eq!(serde_json::to_string(&ZoomDirective::Scale(0.75)).unwrap(), "0.75");

        let parsed: Vec<ZoomDirective> = serde_json::from_str("[\"fit-width\", 2, 1.5]").unwrap();
        assert_eq!(
            parsed,
            vec![
                ZoomDirective::FitWidth,
                ZoomDirective::Scale(2.0),
                ZoomDirective::Scale(1.5)
            ]
        );
    }

    #[test]
    fn test_presets_start_with_fit_modes() {
        assert_eq!(ZOOM_LEVELS[0].directive, ZoomDirective::default());
        assert_eq!(ZOOM_LEVELS[1].directive, ZoomDirective::FitPage);
        assert_eq!(ZOOM_LEVELS.len(), 8);
    }
}
