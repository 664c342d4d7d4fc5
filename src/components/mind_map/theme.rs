//! Visual theming for the mind-map.
//!
//! Colors and stroke sizes only; geometry (fonts, radii, margins) lives in
//! [`crate::config::GraphConfig`].

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Link stroke style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	pub color: Color,
	/// Line width of ordinary links.
	pub width: f64,
	/// Line width of links leaving the focal node.
	pub focal_width: f64,
	/// Arrowhead length along the link.
	pub arrow_length: f64,
	/// Half-angle of the arrowhead in radians.
	pub arrow_spread: f64,
}

/// Node fill and label style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub fill: Color,
	/// Fill of the focal node.
	pub focal_fill: Color,
	pub label: Color,
	/// Ring drawn around a node whose expansion is in flight.
	pub loading_ring: Color,
	/// Period of one loading-dot step, in seconds.
	pub loading_step: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	pub link: LinkStyle,
	pub node: NodeStyle,
}

impl Theme {
	/// Black discs on white, the classic mind-map look (default)
	pub fn paper() -> Self {
		Self {
			name: "paper",
			background: Color::rgb(255, 255, 255),
			link: LinkStyle {
				color: Color::rgb(153, 153, 153),
				width: 1.5,
				focal_width: 3.0,
				arrow_length: 12.0,
				arrow_spread: 0.3,
			},
			node: NodeStyle {
				fill: Color::rgb(0, 0, 0),
				focal_fill: Color::rgb(0, 0, 0),
				label: Color::rgb(255, 255, 255),
				loading_ring: Color::rgba(0, 0, 0, 0.35),
				loading_step: 0.3,
			},
		}
	}

	/// Dark slate variant
	pub fn midnight() -> Self {
		let background = Color::rgb(22, 27, 34);
		Self {
			name: "midnight",
			background,
			link: LinkStyle {
				color: Color::rgba(140, 160, 180, 0.6),
				width: 1.5,
				focal_width: 3.0,
				arrow_length: 12.0,
				arrow_spread: 0.3,
			},
			node: NodeStyle {
				fill: Color::rgb(94, 129, 172),
				focal_fill: Color::rgb(94, 129, 172).lerp(Color::rgb(255, 255, 255), 0.2),
				label: Color::rgb(255, 255, 255),
				loading_ring: Color::rgb(129, 161, 193).with_alpha(0.5),
				loading_step: 0.3,
			},
		}
	}

	/// Look up a theme by name, falling back to [`Theme::paper`].
	pub fn by_name(name: &str) -> Self {
		match name {
			"midnight" => Self::midnight(),
			_ => Self::paper(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::paper()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_colors_render_as_hex() {
		assert_eq!(Color::rgb(153, 153, 153).to_css(), "#999999");
		assert_eq!(Color::rgba(0, 0, 0, 0.5).to_css(), "rgba(0, 0, 0, 0.5)");
	}

	#[test]
	fn unknown_theme_name_is_paper() {
		assert_eq!(Theme::by_name("nope").name, "paper");
		assert_eq!(Theme::by_name("midnight").name, "midnight");
	}
}
