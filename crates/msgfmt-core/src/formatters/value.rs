//! `number`, `date` and `time` placeholders and locale-aware value rendering.

use super::Formatter;
use crate::engine::FormatEngine;
use crate::error::{MessageFormatError, MessageFormatResult};
use crate::request::FormatRequest;
use crate::value::{MessageArgs, Value};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use icu::calendar::{Date, Iso};
use icu::datetime::{fieldsets, DateTimeFormatter, NoCalendarFormatter};
use icu::decimal::input::Decimal;
use icu::decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu::decimal::DecimalFormatter;
use icu::locale::{locale, Locale};
use icu::time::Time;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Style of a `{x, number, style}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberStyle {
    /// Grouped digits with the visible fraction
    #[default]
    Decimal,
    /// Grouped digits rounded to a whole number
    Integer,
    /// Value times 100, rounded, with a percent sign
    Percent,
}

impl FromStr for NumberStyle {
    type Err = MessageFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "decimal" => Ok(Self::Decimal),
            "integer" => Ok(Self::Integer),
            "percent" => Ok(Self::Percent),
            other => Err(MessageFormatError::unsupported_style("number", other)),
        }
    }
}

/// Style of a `{x, date, style}` or `{x, time, style}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateTimeStyle {
    /// Numeric
    #[default]
    Short,
    /// Abbreviated month names where the locale has them
    Medium,
    /// Full month names
    Long,
    /// Full month and weekday names
    Full,
}

impl DateTimeStyle {
    fn parse(formatter: &str, style: &str) -> MessageFormatResult<Self> {
        match style {
            "" | "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            "full" => Ok(Self::Full),
            other => Err(MessageFormatError::unsupported_style(formatter, other)),
        }
    }
}

/// Turns values into locale-specific text.
///
/// The engine ships [`LocaleValueRenderer`]; hosts with their own locale
/// data can supply a renderer through the builder.
pub trait ValueRenderer: Send + Sync {
    /// Text of a plain `{variable}`.
    fn render_value(&self, locale: &str, value: &Value) -> MessageFormatResult<String>;

    /// Text of a `number` placeholder.
    fn render_number(&self, locale: &str, value: &Value, style: NumberStyle)
        -> MessageFormatResult<String>;

    /// Text of a `date` placeholder.
    fn render_date(&self, locale: &str, value: &Value, style: DateTimeStyle)
        -> MessageFormatResult<String>;

    /// Text of a `time` placeholder.
    fn render_time(&self, locale: &str, value: &Value, style: DateTimeStyle)
        -> MessageFormatResult<String>;
}

/// Renderer backed by the CLDR data compiled into `icu`.
///
/// Numbers go through [`DecimalFormatter`], dates through
/// [`DateTimeFormatter`] and times through [`NoCalendarFormatter`]. Tags
/// `icu` cannot parse render like English.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleValueRenderer;

impl LocaleValueRenderer {
    fn icu_locale(locale: &str) -> Locale {
        locale.replace('_', "-").parse().unwrap_or_else(|_| {
            debug!(locale, "Locale not understood by icu, rendering as English");
            locale!("en")
        })
    }

    fn decimal_formatter(locale: &Locale, grouping: bool) -> MessageFormatResult<DecimalFormatter> {
        let mut options = DecimalFormatterOptions::default();
        if !grouping {
            options.grouping_strategy = Some(GroupingStrategy::Never);
        }
        DecimalFormatter::try_new(locale.clone().into(), options)
            .map_err(|e| MessageFormatError::formatter(format!("no number data for '{locale}': {e}")))
    }

    fn decimal_of(value: &Value) -> MessageFormatResult<Decimal> {
        let text = value.to_decimal_string()?;
        let unsigned = text.strip_prefix('+').unwrap_or(&text);
        Decimal::from_str(unsigned).map_err(|_| MessageFormatError::invalid_number(&text))
    }
}

fn date_of(value: &Value) -> MessageFormatResult<NaiveDate> {
    match value {
        Value::Date(date) => Ok(*date),
        Value::DateTime(datetime) => Ok(datetime.date()),
        other => Err(MessageFormatError::formatter(format!(
            "expected a date but got a {} value",
            other.kind()
        ))),
    }
}

fn time_of(value: &Value) -> MessageFormatResult<NaiveTime> {
    match value {
        Value::DateTime(datetime) => Ok(datetime.time()),
        other => Err(MessageFormatError::formatter(format!(
            "expected a date-time but got a {} value",
            other.kind()
        ))),
    }
}

fn iso_date(date: NaiveDate) -> MessageFormatResult<Date<Iso>> {
    let out_of_range = || MessageFormatError::formatter(format!("{date} cannot be rendered"));
    let month = u8::try_from(date.month()).map_err(|_| out_of_range())?;
    let day = u8::try_from(date.day()).map_err(|_| out_of_range())?;
    Date::try_new_iso(date.year(), month, day).map_err(|_| out_of_range())
}

fn icu_time(time: NaiveTime) -> MessageFormatResult<Time> {
    let out_of_range = || MessageFormatError::formatter(format!("{time} cannot be rendered"));
    let hour = u8::try_from(time.hour()).map_err(|_| out_of_range())?;
    let minute = u8::try_from(time.minute()).map_err(|_| out_of_range())?;
    // leap seconds are folded into :59
    let second = u8::try_from(time.second().min(59)).map_err(|_| out_of_range())?;
    Time::try_new(hour, minute, second, 0).map_err(|_| out_of_range())
}

fn load_error(locale: &Locale, error: impl fmt::Display) -> MessageFormatError {
    MessageFormatError::formatter(format!("no date and time data for '{locale}': {error}"))
}

impl ValueRenderer for LocaleValueRenderer {
    fn render_value(&self, locale: &str, value: &Value) -> MessageFormatResult<String> {
        match value {
            Value::Float(_) | Value::Decimal(_) => {
                let decimal = Self::decimal_of(value)?;
                let formatter = Self::decimal_formatter(&Self::icu_locale(locale), false)?;
                Ok(formatter.format(&decimal).to_string())
            }
            other => Ok(other.to_string()),
        }
    }

    fn render_number(
        &self,
        locale: &str,
        value: &Value,
        style: NumberStyle,
    ) -> MessageFormatResult<String> {
        let mut decimal = Self::decimal_of(value)?;
        let formatter = Self::decimal_formatter(&Self::icu_locale(locale), true)?;

        let text = match style {
            NumberStyle::Decimal => formatter.format(&decimal).to_string(),
            NumberStyle::Integer => {
                decimal.round(0);
                formatter.format(&decimal).to_string()
            }
            NumberStyle::Percent => {
                decimal.multiply_pow10(2);
                decimal.round(0);
                format!("{}%", formatter.format(&decimal))
            }
        };
        Ok(text)
    }

    fn render_date(
        &self,
        locale: &str,
        value: &Value,
        style: DateTimeStyle,
    ) -> MessageFormatResult<String> {
        let date = iso_date(date_of(value)?)?;
        let locale = Self::icu_locale(locale);
        let prefs = locale.clone().into();

        let text = match style {
            DateTimeStyle::Short => DateTimeFormatter::try_new(prefs, fieldsets::YMD::short())
                .map(|f| f.format(&date).to_string()),
            DateTimeStyle::Medium => DateTimeFormatter::try_new(prefs, fieldsets::YMD::medium())
                .map(|f| f.format(&date).to_string()),
            DateTimeStyle::Long => DateTimeFormatter::try_new(prefs, fieldsets::YMD::long())
                .map(|f| f.format(&date).to_string()),
            DateTimeStyle::Full => DateTimeFormatter::try_new(prefs, fieldsets::YMDE::long())
                .map(|f| f.format(&date).to_string()),
        };
        text.map_err(|e| load_error(&locale, e))
    }

    fn render_time(
        &self,
        locale: &str,
        value: &Value,
        style: DateTimeStyle,
    ) -> MessageFormatResult<String> {
        let time = icu_time(time_of(value)?)?;
        let locale = Self::icu_locale(locale);
        let fieldset = match style {
            DateTimeStyle::Short => fieldsets::T::short(),
            _ => fieldsets::T::medium(),
        };

        NoCalendarFormatter::try_new(locale.clone().into(), fieldset)
            .map(|f| f.format(&time).to_string())
            .map_err(|e| load_error(&locale, e))
    }
}

/// Which value formatter a [`ValueFormatter`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `number`
    Number,
    /// `date`
    Date,
    /// `time`
    Time,
}

impl ValueKind {
    /// Formatter name in patterns.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Date => "date",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `number`, `date` or `time` formatter taking an optional style token.
///
/// The variable must be bound; null renders as the empty string.
pub struct ValueFormatter {
    kind: ValueKind,
    renderer: Arc<dyn ValueRenderer>,
}

impl ValueFormatter {
    /// Creates the formatter for `kind`.
    pub fn new(kind: ValueKind, renderer: Arc<dyn ValueRenderer>) -> Self {
        Self { kind, renderer }
    }
}

impl Formatter for ValueFormatter {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn can_format(&self, request: &FormatRequest) -> bool {
        request.formatter_name.as_deref() == Some(self.kind.name())
    }

    fn variable_must_exist(&self) -> bool {
        true
    }

    fn format(
        &self,
        locale: &str,
        request: &FormatRequest,
        _args: &MessageArgs,
        value: Option<&Value>,
        _engine: &dyn FormatEngine,
    ) -> MessageFormatResult<String> {
        let style = request.formatter_args.as_deref().unwrap_or("").trim();
        let Some(value) = value else {
            // Styles are validated even for nulls.
            return match self.kind {
                ValueKind::Number => style.parse::<NumberStyle>().map(|_| String::new()),
                kind => DateTimeStyle::parse(kind.name(), style).map(|_| String::new()),
            };
        };

        match self.kind {
            ValueKind::Number => self.renderer.render_number(locale, value, style.parse()?),
            ValueKind::Date => {
                let style = DateTimeStyle::parse(self.kind.name(), style)?;
                self.renderer.render_date(locale, value, style)
            }
            ValueKind::Time => {
                let style = DateTimeStyle::parse(self.kind.name(), style)?;
                self.renderer.render_time(locale, value, style)
            }
        }
    }
}
