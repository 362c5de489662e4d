// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Display, Formatter},
          ops::Add,
          sync::{Arc, LazyLock, Mutex as StdMutex, PoisonError,
                 atomic::{AtomicU64, Ordering}}};

use tracing::{debug, warn};

use crate::{InlineString, InlineVecParams, OutputDevice, PaletteResult, SGR_RESET,
            SgrSequence};

/// Identity of the palette that built an entry. Two entries combine into one that
/// keeps the family default only if they share this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteId(u64);

impl PaletteId {
    #[must_use]
    pub fn new_unique() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

static NOOP_STYLE_ENTRY: LazyLock<Arc<StyleEntry>> = LazyLock::new(|| {
    Arc::new(StyleEntry::new("", InlineVecParams::new(), String::new(), None))
});

/// A resolved style: an ordered list of SGR parameter tokens and the escape sequence
/// that undoes them.
///
/// - An entry with no parameters is a no-op. It renders as the empty string, and
///   [`Self::apply`] returns the text unchanged.
/// - Entries are immutable except for their output device, see [`Self::set_output`].
/// - [`Self::combine`] (or `&a + &b`) never mutates either operand.
#[derive(Debug)]
pub struct StyleEntry {
    name: InlineString,
    params: InlineVecParams,
    default: String,
    palette_id: Option<PaletteId>,
    output: StdMutex<OutputDevice>,
}

impl Clone for StyleEntry {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            params: self.params.clone(),
            default: self.default.clone(),
            palette_id: self.palette_id,
            output: StdMutex::new(self.output()),
        }
    }
}

impl StyleEntry {
    /// `name` is upper cased for display. `default` is a complete escape sequence, eg:
    /// `\x1b[39m`.
    #[must_use]
    pub fn new(
        name: &str,
        params: InlineVecParams,
        default: String,
        palette_id: Option<PaletteId>,
    ) -> Self {
        Self {
            name: InlineString::from(name.to_uppercase().as_str()),
            params,
            default,
            palette_id,
            output: StdMutex::new(OutputDevice::default()),
        }
    }

    /// The shared no-op entry.
    #[must_use]
    pub fn noop() -> Arc<StyleEntry> { NOOP_STYLE_ENTRY.clone() }

    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    #[must_use]
    pub fn params(&self) -> &[crate::ParamToken] { &self.params }

    /// The escape sequence emitted after styled text.
    #[must_use]
    pub fn default_sequence(&self) -> &str { &self.default }

    #[must_use]
    pub fn palette_id(&self) -> Option<PaletteId> { self.palette_id }

    /// `false` for a no-op entry.
    #[must_use]
    pub fn is_active(&self) -> bool { !self.params.is_empty() }

    #[must_use]
    pub fn is_noop(&self) -> bool { self.params.is_empty() }

    /// `ESC [ <params joined by ;> m`, or the empty string for a no-op.
    #[must_use]
    pub fn render(&self) -> String { self.to_string() }

    /// Just the parameters, joined by `;`.
    #[must_use]
    pub fn render_params(&self) -> String { SgrSequence(&self.params).params_joined() }
}

mod combine_impl {
    #[allow(clippy::wildcard_imports)]
    use super::*;

    impl StyleEntry {
        /// A new entry with `self`'s parameters followed by `other`'s.
        ///
        /// The result keeps `self`'s default if both came from the same palette,
        /// otherwise it uses the generic reset [`SGR_RESET`]. A no-op operand
        /// contributes nothing, so the other operand is returned as is.
        #[must_use]
        pub fn combine(&self, other: &StyleEntry) -> StyleEntry {
            if other.is_noop() {
                return self.clone();
            }
            if self.is_noop() {
                return other.clone();
            }

            let is_same_palette = self.palette_id == other.palette_id;
            let mut params = self.params.clone();
            params.extend(other.params.iter().cloned());

            let (default, palette_id) = if is_same_palette {
                (self.default.clone(), self.palette_id)
            } else {
                (SGR_RESET.to_string(), None)
            };

            StyleEntry {
                name: self.name.clone(),
                params,
                default,
                palette_id,
                output: StdMutex::new(self.output()),
            }
        }

        /// `render() + text + default`.
        #[must_use]
        pub fn apply(&self, text: &str) -> String {
            format!("{self}{text}{}", self.default)
        }

        /// Fold `styles` into `self`, left to right, then [`Self::apply`].
        #[must_use]
        pub fn apply_with(&self, text: &str, styles: &[&StyleEntry]) -> String {
            if styles.is_empty() {
                return self.apply(text);
            }
            let combined = styles
                .iter()
                .fold(self.clone(), |acc, style| acc.combine(style));
            combined.apply(text)
        }

        /// `render() + placeholder + default`, eg: for use with `format!` style
        /// templates where the placeholder is `{}`.
        #[must_use]
        pub fn template(&self, placeholder: &str) -> String { self.apply(placeholder) }
    }

    impl Display for StyleEntry {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", SgrSequence(&self.params))
        }
    }

    /// `&a + &b` is [`StyleEntry::combine`].
    impl Add<&StyleEntry> for &StyleEntry {
        type Output = StyleEntry;

        fn add(self, rhs: &StyleEntry) -> Self::Output { self.combine(rhs) }
    }

    /// `&a + "text"` is the rendered sequence followed by the text, with no reset.
    impl Add<&str> for &StyleEntry {
        type Output = String;

        fn add(self, rhs: &str) -> Self::Output { format!("{self}{rhs}") }
    }

    /// `String::from("text") + &a` is the text followed by the rendered sequence.
    impl Add<&StyleEntry> for String {
        type Output = String;

        fn add(mut self, rhs: &StyleEntry) -> Self::Output {
            use std::fmt::Write as _;
            // Writing into a String can't fail.
            _ = write!(self, "{rhs}");
            self
        }
    }
}

mod scoped_impl {
    #[allow(clippy::wildcard_imports)]
    use super::*;

    impl StyleEntry {
        /// Redirect the output of [`Self::enter`] and [`Self::scoped`]. This is the
        /// only mutable part of an entry.
        pub fn set_output(&self, output_device: OutputDevice) {
            *self.output.lock().unwrap_or_else(PoisonError::into_inner) = output_device;
        }

        #[must_use]
        pub fn output(&self) -> OutputDevice {
            self.output
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Emit the style to the output device right away, and return a guard that
        /// emits the default when it is dropped (or when [`StyleGuard::exit`] is
        /// called).
        ///
        /// # Errors
        ///
        /// [`crate::PaletteError::OutputWriteFailure`] if the style can't be written.
        /// Part of the sequence may have reached the device, so the default is still
        /// emitted (best effort) before the error is returned.
        pub fn enter(&self) -> PaletteResult<StyleGuard> {
            let sequence = self.render();
            debug!(name = %self.name, sequence = ?sequence, "enter style");
            // Dropping the guard on the error path emits the default.
            let guard = StyleGuard {
                output_device: self.output(),
                default: self.default.clone(),
                is_released: false,
            };
            if !sequence.is_empty() {
                guard.output_device.write_and_flush(&sequence)?;
            }
            Ok(guard)
        }

        /// Run `f` between [`Self::enter`] and the release of the returned guard. The
        /// default is emitted even if `f` panics.
        ///
        /// # Errors
        ///
        /// [`crate::PaletteError::OutputWriteFailure`] if the style or its default
        /// can't be written.
        pub fn scoped<R>(&self, f: impl FnOnce() -> R) -> PaletteResult<R> {
            let guard = self.enter()?;
            let result = f();
            guard.exit()?;
            Ok(result)
        }
    }
}

/// Returned by [`StyleEntry::enter`]. Emits the entry's default exactly once.
#[derive(Debug)]
#[must_use = "the default is emitted as soon as the guard is dropped"]
pub struct StyleGuard {
    output_device: OutputDevice,
    default: String,
    is_released: bool,
}

impl StyleGuard {
    /// Emit the default now, and report a write failure, which [Drop] can't.
    ///
    /// # Errors
    ///
    /// [`crate::PaletteError::OutputWriteFailure`] if the default can't be written.
    pub fn exit(mut self) -> PaletteResult<()> {
        self.is_released = true;
        self.release()?;
        Ok(())
    }

    fn release(&self) -> std::io::Result<()> {
        if self.default.is_empty() {
            return Ok(());
        }
        self.output_device.write_and_flush(&self.default)
    }
}

impl Drop for StyleGuard {
    fn drop(&mut self) {
        if self.is_released {
            return;
        }
        self.is_released = true;
        if let Err(err) = self.release() {
            warn!(%err, "could not emit style default on scope exit");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{ErrorKind, Write};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ParamToken, PaletteError, StdoutMock};

    fn entry(name: &str, params: &[&str], default: &str, id: Option<PaletteId>) -> StyleEntry {
        StyleEntry::new(
            name,
            params.iter().map(|it| ParamToken::from(*it)).collect(),
            default.to_string(),
            id,
        )
    }

    #[derive(Debug)]
    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    /// Forwards to `sink`, failing on demand. Write and flush calls are counted
    /// from 1.
    #[derive(Debug, Default)]
    struct FlakyWriter {
        sink: StdoutMock,
        fail_on_write: Option<usize>,
        fail_on_flush: Option<usize>,
        short_first_write: bool,
        write_count: usize,
        flush_count: usize,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.write_count += 1;
            if self.fail_on_write == Some(self.write_count) {
                return Err(std::io::Error::new(ErrorKind::BrokenPipe, "closed"));
            }
            let buf = if self.short_first_write && self.write_count == 1 {
                &buf[..buf.len() / 2]
            } else {
                buf
            };
            self.sink.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flush_count += 1;
            if self.fail_on_flush == Some(self.flush_count) {
                return Err(std::io::Error::new(ErrorKind::BrokenPipe, "closed"));
            }
            Ok(())
        }
    }

    /// Collect everything logged at `warn` and above while `f` runs.
    fn capture_warnings(f: impl FnOnce()) -> String {
        let log_sink = StdoutMock::new();
        let make_writer = {
            let log_sink = log_sink.clone();
            move || log_sink.clone()
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        log_sink.get_copy_of_buffer_as_string()
    }

    #[test]
    fn test_render() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        assert_eq!(red.render(), "\x1b[31m");
        assert_eq!(red.render_params(), "31");
        assert_eq!(red.name(), "RED");
        assert!(red.is_active());
    }

    #[test]
    fn test_noop() {
        let noop = StyleEntry::noop();
        assert!(noop.is_noop());
        assert_eq!(noop.render(), "");
        assert_eq!(noop.apply("text"), "text");
        assert_eq!(noop.template("{}"), "{}");
        assert!(Arc::ptr_eq(&noop, &StyleEntry::noop()));
    }

    #[test]
    fn test_combine_same_palette_keeps_default() {
        let id = Some(PaletteId::new_unique());
        let bold = entry("bold", &["1"], "\x1b[0m", id);
        let italic = entry("italic", &["3"], "\x1b[0m", id);
        let red = entry("red", &["31"], "\x1b[39m", id);
        let blue = entry("blue", &["34"], "\x1b[39m", id);

        let combined = red.combine(&blue);
        assert_eq!(combined.render(), "\x1b[31;34m");
        assert_eq!(combined.default_sequence(), "\x1b[39m");
        assert_eq!(combined.name(), "RED");
        assert_eq!((&bold + &italic).default_sequence(), "\x1b[0m");
    }

    #[test]
    fn test_combine_different_palettes_uses_reset() {
        let fg = entry("red", &["31"], "\x1b[39m", Some(PaletteId::new_unique()));
        let bg = entry("blue", &["44"], "\x1b[49m", Some(PaletteId::new_unique()));

        let combined = &fg + &bg;
        assert_eq!(combined.render(), "\x1b[31;44m");
        assert_eq!(combined.default_sequence(), SGR_RESET);
        assert_eq!(combined.palette_id(), None);
    }

    #[test]
    fn test_combine_preserves_order_and_operands() {
        let id = Some(PaletteId::new_unique());
        let a = entry("a", &["1", "2"], "\x1b[0m", id);
        let b = entry("b", &["38;5;208"], "\x1b[0m", id);

        let combined = a.combine(&b);
        assert_eq!(
            combined.render(),
            format!("\x1b[{};{}m", a.render_params(), b.render_params())
        );
        assert_eq!(a.render(), "\x1b[1;2m");
        assert_eq!(b.render(), "\x1b[38;5;208m");
    }

    #[test]
    fn test_combine_with_noop() {
        let red = entry("red", &["31"], "\x1b[39m", Some(PaletteId::new_unique()));
        let noop = StyleEntry::noop();
        assert_eq!(red.combine(&noop).apply("x"), "\x1b[31mx\x1b[39m");
        assert_eq!(noop.combine(&red).apply("x"), "\x1b[31mx\x1b[39m");
        assert!(noop.combine(&noop).is_noop());
    }

    #[test]
    fn test_apply_and_template() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        assert_eq!(red.apply("hi"), "\x1b[31mhi\x1b[39m");
        assert_eq!(red.template("%s"), "\x1b[31m%s\x1b[39m");
    }

    #[test]
    fn test_apply_with() {
        let fg_id = Some(PaletteId::new_unique());
        let fx_id = Some(PaletteId::new_unique());
        let red = entry("red", &["31"], "\x1b[39m", fg_id);
        let bold = entry("bold", &["1"], "\x1b[0m", fx_id);
        let italic = entry("italic", &["3"], "\x1b[0m", fx_id);

        assert_eq!(
            red.apply_with("hi", &[&bold, &italic]),
            "\x1b[31;1;3mhi\x1b[0m"
        );
        assert_eq!(bold.apply_with("hi", &[&italic]), "\x1b[1;3mhi\x1b[0m");
        assert_eq!(red.apply_with("hi", &[]), red.apply("hi"));
    }

    #[test]
    fn test_string_concatenation() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        assert_eq!(&red + "text", "\x1b[31mtext");
        assert_eq!(String::from("text") + &red, "text\x1b[31m");
    }

    #[test]
    fn test_enter_and_exit() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        let (device, stdout_mock) = OutputDevice::new_mock();
        red.set_output(device);

        let guard = red.enter().unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[31m");
        guard.exit().unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[31m\x1b[39m");
    }

    #[test]
    fn test_guard_drop_emits_default_once() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        let (device, stdout_mock) = OutputDevice::new_mock();
        red.set_output(device);

        {
            let _guard = red.enter().unwrap();
            write!(red.output().lock(), "text").unwrap();
        }
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[31mtext\x1b[39m"
        );
    }

    #[test]
    fn test_scoped_returns_value() {
        let bold = entry("bold", &["1"], "\x1b[0m", None);
        let (device, stdout_mock) = OutputDevice::new_mock();
        bold.set_output(device);

        let result = bold.scoped(|| 42).unwrap();
        assert_eq!(result, 42);
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[1m\x1b[0m");
    }

    #[test]
    fn test_default_emitted_on_panic() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        let (device, stdout_mock) = OutputDevice::new_mock();
        red.set_output(device);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            red.scoped(|| panic!("boom")).unwrap();
        }));
        assert!(result.is_err());
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[31m\x1b[39m");
    }

    #[test]
    fn test_noop_enter_writes_nothing() {
        let noop = entry("", &[], "", None);
        let (device, stdout_mock) = OutputDevice::new_mock();
        noop.set_output(device);
        noop.scoped(|| ()).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
    }

    #[test]
    fn test_enter_write_failure() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        red.set_output(OutputDevice::new_with_writer(FailingWriter));
        let result = red.enter();
        assert!(matches!(result, Err(PaletteError::OutputWriteFailure(_))));
    }

    #[test]
    fn test_enter_flush_failure_still_emits_default() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        let sink = StdoutMock::new();
        red.set_output(OutputDevice::new_with_writer(FlakyWriter {
            sink: sink.clone(),
            fail_on_flush: Some(1),
            ..Default::default()
        }));

        let result = red.scoped(|| ());
        assert!(matches!(result, Err(PaletteError::OutputWriteFailure(_))));
        assert_eq!(sink.get_copy_of_buffer_as_string(), "\x1b[31m\x1b[39m");
    }

    #[test]
    fn test_enter_partial_write_still_emits_default() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        let sink = StdoutMock::new();
        red.set_output(OutputDevice::new_with_writer(FlakyWriter {
            sink: sink.clone(),
            short_first_write: true,
            fail_on_write: Some(2),
            ..Default::default()
        }));

        let result = red.enter();
        assert!(matches!(result, Err(PaletteError::OutputWriteFailure(_))));
        // `\x1b[31m` is 5 bytes, only the first 2 got through.
        assert_eq!(sink.get_copy_of_buffer_as_string(), "\x1b[\x1b[39m");
    }

    #[test]
    fn test_exit_reports_release_failure() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        let sink = StdoutMock::new();
        red.set_output(OutputDevice::new_with_writer(FlakyWriter {
            sink: sink.clone(),
            fail_on_write: Some(2),
            ..Default::default()
        }));

        let guard = red.enter().unwrap();
        let result = guard.exit();
        assert!(matches!(result, Err(PaletteError::OutputWriteFailure(_))));
        assert_eq!(sink.get_copy_of_buffer_as_string(), "\x1b[31m");
    }

    #[test]
    fn test_drop_logs_release_failure() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        let sink = StdoutMock::new();
        red.set_output(OutputDevice::new_with_writer(FlakyWriter {
            sink: sink.clone(),
            fail_on_write: Some(2),
            ..Default::default()
        }));

        let guard = red.enter().unwrap();
        let logs = capture_warnings(|| drop(guard));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("could not emit style default on scope exit"));
        assert_eq!(sink.get_copy_of_buffer_as_string(), "\x1b[31m");
    }

    #[test]
    fn test_clone_shares_output_device() {
        let red = entry("red", &["31"], "\x1b[39m", None);
        let (device, stdout_mock) = OutputDevice::new_mock();
        red.set_output(device);

        let copy = red.clone();
        copy.scoped(|| ()).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[31m\x1b[39m");
    }
}
