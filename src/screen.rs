//! Text output: the display seam, a renderer for any `embedded-graphics`
//! target, and the fixed screens the meter shows.

use core::fmt::Write as _;

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        iso_8859_1::FONT_10X20,
    },
    pixelcolor::Rgb565,
    prelude::*,
    text::{
        Baseline as TextBaseline,
        Text,
    },
};

use crate::{
    calibrator::Progress,
    config::LINE_WIDTH,
};

/// One fixed-width display line.
pub type TextLine = heapless::String<LINE_WIDTH>;

/// Height of one rendered line in pixels.
const LINE_HEIGHT: i32 = 20;

/// Left margin in pixels.
const MARGIN: i32 = 8;

/// A screen that shows a handful of text lines, replacing what was there.
pub trait TextDisplay {
    fn show_lines(&mut self, lines: &[&str]);
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    fn show_lines(&mut self, lines: &[&str]) {
        (**self).show_lines(lines);
    }
}

/// Renders lines top-down in a 10×20 font on any RGB565 target.
pub struct TextScreen<D> {
    target: D,
    foreground: Rgb565,
    background: Rgb565,
}

impl<D> TextScreen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub const fn new(target: D) -> Self {
        Self {
            target,
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
        }
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    fn draw(&mut self, lines: &[&str]) -> Result<(), D::Error> {
        self.target.clear(self.background)?;
        let style = MonoTextStyle::new(&FONT_10X20, self.foreground);
        for (row, line) in lines.iter().enumerate() {
            Text::with_baseline(
                line,
                Point::new(MARGIN, row as i32 * LINE_HEIGHT),
                style,
                TextBaseline::Top,
            )
            .draw(&mut self.target)?;
        }
        Ok(())
    }
}

impl<D> TextDisplay for TextScreen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn show_lines(&mut self, lines: &[&str]) {
        if self.draw(lines).is_err() {
            warn!("display write failed");
        }
    }
}

/// Format into a fixed-width line, truncating what does not fit.
fn line(args: core::fmt::Arguments<'_>) -> TextLine {
    let mut out = TextLine::new();
    // Overflow drops the fragment that did not fit.
    let _ = out.write_fmt(args);
    out
}

pub(crate) fn show_calibrating(display: &mut impl TextDisplay, progress: Progress) {
    let percent = line(format_args!("{}%", progress.percent()));
    display.show_lines(&["Calibrating", "background noise", "", percent.as_str(), "", "Keep quiet"]);
}

pub(crate) fn show_ready(display: &mut impl TextDisplay) {
    display.show_lines(&["SPL meter ready", "", "Press A", "to start"]);
}

pub(crate) fn show_measuring(display: &mut impl TextDisplay, seconds: u64) {
    let window = line(format_args!("for {} seconds", seconds));
    display.show_lines(&["Measuring...", window.as_str()]);
}

pub(crate) fn show_report(display: &mut impl TextDisplay, max_db: f32) {
    let max = line(format_args!("Max: {:.1} dB", max_db));
    display.show_lines(&["Test complete", "", max.as_str(), "", "Press A", "to restart"]);
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<Vec<String>>);

    impl TextDisplay for Recorder {
        fn show_lines(&mut self, lines: &[&str]) {
            self.0.push(lines.iter().map(|l| l.to_string()).collect());
        }
    }

    #[test]
    fn test_report_formats_one_decimal() {
        let mut display = Recorder::default();
        show_report(&mut display, 53.979);
        assert_eq!(display.0[0][2], "Max: 54.0 dB");
    }

    #[test]
    fn test_line_truncates_to_width() {
        let long = line(format_args!("{}", "x".repeat(LINE_WIDTH + 10)));
        assert!(long.len() <= LINE_WIDTH);
    }

    #[test]
    fn test_renders_text_pixels() {
        let mut mock = MockDisplay::<Rgb565>::new();
        mock.set_allow_out_of_bounds_drawing(true);
        mock.set_allow_overdraw(true);
        let mut screen = TextScreen::new(mock);
        screen.show_lines(&["A"]);
        let mock = screen.into_inner();
        assert_eq!(mock.get_pixel(Point::zero()), Some(Rgb565::BLACK));
        let lit = (0..20)
            .flat_map(|y| (MARGIN..MARGIN + 10).map(move |x| Point::new(x, y)))
            .any(|p| mock.get_pixel(p) == Some(Rgb565::WHITE));
        assert!(lit);
    }
}
