use serde::{Deserialize, Serialize};

/// One point of a timeseries fed into the chart layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSample {
    /// Display label for the point (usually a date string)
    pub key: String,
    /// Measured quantity
    pub value: f64,
}

impl NumericSample {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Rounded display range for a chart value axis.
///
/// `max >= min` always holds for bounds produced by the axis scaler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub max: f64,
    pub min: f64,
}

impl AxisBounds {
    pub fn new(max: f64, min: f64) -> Self {
        Self { max, min }
    }

    /// Distance between the two bounds
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Pixel coordinate on the chart canvas (origin at the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

impl ChartPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas size and padding used when projecting samples to pixels.
///
/// The top edge is never padded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartCanvas {
    pub width: f64,
    pub height: f64,
    pub left_pad: f64,
    pub right_pad: f64,
    pub bottom_pad: f64,
}

impl ChartCanvas {
    /// Horizontal space available for plotting
    pub fn plot_width(&self) -> f64 {
        (self.width - self.left_pad - self.right_pad).max(0.0)
    }

    /// Vertical space available for plotting; also the y of the axis baseline
    pub fn plot_height(&self) -> f64 {
        (self.height - self.bottom_pad).max(0.0)
    }
}

impl Default for ChartCanvas {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 220.0,
            left_pad: 48.0,
            right_pad: 16.0,
            bottom_pad: 24.0,
        }
    }
}

/// A single drawing instruction for the canvas renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(ChartPoint),
    LineTo(ChartPoint),
    Close,
}

/// Ordered list of path commands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPath {
    pub commands: Vec<PathCommand>,
}

impl ChartPath {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

/// Output of projecting a series onto a canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    /// Marker position for every sample, in sample order
    pub points: Vec<ChartPoint>,
    /// Polyline through the plotted samples
    pub line_path: ChartPath,
    /// Area under the polyline, closed down to the baseline
    pub fill_path: Option<ChartPath>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridOrientation {
    /// Grid line parallel to the x axis (value labels)
    Horizontal,
    /// Grid line parallel to the y axis (timeline labels)
    Vertical,
}

/// One grid line and the label drawn next to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub orientation: GridOrientation,
    /// y pixel for horizontal lines, x pixel for vertical lines
    pub position: f64,
    pub label: String,
}

/// Axis decoration for a chart: value grid and timeline grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDecoration {
    pub horizontal: Vec<GridLine>,
    pub vertical: Vec<GridLine>,
}

/// A pending one-shot reminder, unique by `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAlarm {
    pub id: i32,
    /// Unix epoch millis at which the alarm fires
    pub trigger_time_millis: i64,
    pub title: String,
    pub message: String,
}

impl ScheduledAlarm {
    pub fn new(id: i32, trigger_time_millis: i64, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            trigger_time_millis,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Whether the trigger time is at or before `now_millis`
    pub fn is_due(&self, now_millis: i64) -> bool {
        self.trigger_time_millis <= now_millis
    }
}

/// Data handed to the notification receiver when an alarm fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmPayload {
    pub title: String,
    pub message: String,
    pub notification_id: i32,
}

/// Registration request sent to the OS alarm service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRequest {
    pub trigger_time_millis: i64,
    pub request_id: i32,
    pub payload: AlarmPayload,
}

impl From<&ScheduledAlarm> for AlarmRequest {
    fn from(alarm: &ScheduledAlarm) -> Self {
        Self {
            trigger_time_millis: alarm.trigger_time_millis,
            request_id: alarm.id,
            payload: AlarmPayload {
                title: alarm.title.clone(),
                message: alarm.message.clone(),
                notification_id: alarm.id,
            },
        }
    }
}

/// Result of a schedule request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleOutcome {
    /// Alarm registered and record persisted
    Scheduled,
    /// Exact-alarm permission missing; nothing registered or persisted
    PermissionDenied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_plot_area() {
        let canvas = ChartCanvas {
            width: 300.0,
            height: 200.0,
            left_pad: 40.0,
            right_pad: 10.0,
            bottom_pad: 20.0,
        };
        assert_eq!(canvas.plot_width(), 250.0);
        assert_eq!(canvas.plot_height(), 180.0);
    }

    #[test]
    fn test_canvas_plot_area_never_negative() {
        let canvas = ChartCanvas {
            width: 10.0,
            height: 5.0,
            left_pad: 40.0,
            right_pad: 10.0,
            bottom_pad: 20.0,
        };
        assert_eq!(canvas.plot_width(), 0.0);
        assert_eq!(canvas.plot_height(), 0.0);
    }

    #[test]
    fn test_alarm_request_from_scheduled_alarm() {
        let alarm = ScheduledAlarm::new(7, 1_700_000_000_000, "Rent", "Rent is due today");
        let request = AlarmRequest::from(&alarm);

        assert_eq!(request.request_id, 7);
        assert_eq!(request.trigger_time_millis, 1_700_000_000_000);
        assert_eq!(request.payload.notification_id, 7);
        assert_eq!(request.payload.title, "Rent");
        assert_eq!(request.payload.message, "Rent is due today");
    }

    #[test]
    fn test_alarm_is_due() {
        let alarm = ScheduledAlarm::new(1, 1_000, "t", "m");
        assert!(alarm.is_due(1_000));
        assert!(alarm.is_due(2_000));
        assert!(!alarm.is_due(999));
    }

    #[test]
    fn test_scheduled_alarm_serde_field_names() {
        let alarm = ScheduledAlarm::new(3, 42, "Water bill", "Pay the water bill");
        let json = serde_json::to_string(&alarm).unwrap();
        assert!(json.contains("\"trigger_time_millis\":42"));

        let back: ScheduledAlarm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alarm);
    }
}
