//! Pitch rows of the four feed tables.
//!
//! Each row is the physical value the step count is derived from (threads per
//! inch, millimetres, diametral pitch or module) and its display labels.

/// One row before conversion to steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PitchRow {
    pub value: f64,
    pub rate: &'static str,
    pub pitch: Option<&'static str>,
}

const fn row(value: f64, rate: &'static str, pitch: Option<&'static str>) -> PitchRow {
    PitchRow { value, rate, pitch }
}

/// Threads per inch; rate in inches per revolution.
pub(crate) const INCH: [PitchRow; 76] = [
    row(2000.0, "0.0005", None),
    row(1000.0, "0.001", None),
    row(667.0, "0.0015", None),
    row(500.0, "0.002", None),
    row(400.0, "0.0025", None),
    row(333.0, "0.003", None),
    row(286.0, "0.0035", None),
    row(250.0, "0.004", None),
    row(240.0, "0.0042", Some("240")),
    row(224.0, "0.0045", Some("224")),
    row(216.0, "0.0046", Some("216")),
    row(208.0, "0.0048", Some("208")),
    row(192.0, "0.0052", Some("192")),
    row(184.0, "0.0054", Some("184")),
    row(176.0, "0.0057", Some("176")),
    row(160.0, "0.0062", Some("160")),
    row(144.0, "0.0069", Some("144")),
    row(128.0, "0.0078", Some("128")),
    row(120.0, "0.0083", Some("120")),
    row(112.0, "0.0089", Some("112")),
    row(108.0, "0.0093", Some("108")),
    row(104.0, "0.0096", Some("104")),
    row(100.0, "0.010", Some("100")),
    row(96.0, "0.0104", Some("96")),
    row(92.0, "0.0109", Some("92")),
    row(90.0, "0.0111", Some("90")),
    row(88.0, "0.0114", Some("88")),
    row(80.0, "0.0125", Some("80")),
    row(72.0, "0.0139", Some("72")),
    row(70.0, "0.0143", Some("70")),
    row(64.0, "0.0156", Some("64")),
    row(62.0, "0.0161", Some("62")),
    row(60.0, "0.0167", Some("60")),
    row(56.0, "0.0179", Some("56")),
    row(54.0, "0.0185", Some("54")),
    row(52.0, "0.0192", Some("52")),
    row(50.0, "0.020", Some("50")),
    row(48.0, "0.0208", Some("48")),
    row(46.0, "0.0217", Some("46")),
    row(44.0, "0.0227", Some("44")),
    row(40.0, "0.025", Some("40")),
    row(36.0, "0.0278", Some("36")),
    row(32.0, "0.0312", Some("32")),
    row(30.0, "0.0333", Some("30")),
    row(28.0, "0.0357", Some("28")),
    row(27.0, "0.037", Some("27")),
    row(26.0, "0.0385", Some("26")),
    row(25.0, "0.040", Some("25")),
    row(24.0, "0.0417", Some("24")),
    row(23.0, "0.0434", Some("23")),
    row(22.0, "0.0454", Some("22")),
    row(20.0, "0.050", Some("20")),
    row(19.0, "0.0526", Some("19")),
    row(18.0, "0.0555", Some("18")),
    row(17.5, "0.0571", Some("17½")),
    row(16.0, "0.0625", Some("16")),
    row(15.0, "0.0667", Some("15")),
    row(14.0, "0.0714", Some("14")),
    row(13.5, "0.0741", Some("13½")),
    row(13.0, "0.0769", Some("13")),
    row(12.0, "0.0833", Some("12")),
    row(11.5, "0.087", Some("11½")),
    row(11.0, "0.0909", Some("11")),
    row(10.0, "0.100", Some("10")),
    row(9.0, "0.1111", Some("9")),
    row(8.0, "0.125", Some("8")),
    row(7.5, "0.1333", Some("7½")),
    row(7.0, "0.1429", Some("7")),
    row(6.75, "0.1481", Some("6¾")),
    row(6.5, "0.1538", Some("6½")),
    row(6.0, "0.1667", Some("6")),
    row(5.75, "0.1739", Some("5¾")),
    row(5.5, "0.1818", Some("5½")),
    row(5.0, "0.200", Some("5")),
    row(4.5, "0.2222", Some("4½")),
    row(4.0, "0.250", Some("4")),
];

/// Millimetres per revolution, British Association threads labelled.
pub(crate) const METRIC: [PitchRow; 56] = [
    row(0.01, "0.01", None),
    row(0.02, "0.02", None),
    row(0.03, "0.03", None),
    row(0.04, "0.04", None),
    row(0.05, "0.05", None),
    row(0.06, "0.06", None),
    row(0.07, "0.07", None),
    row(0.08, "0.08", None),
    row(0.09, "0.09", None),
    row(0.10, "0.1", None),
    row(0.12, "0.12", None),
    row(0.15, "0.15", None),
    row(0.20, "0.2", None),
    row(0.225, "0.225", None),
    row(0.25, "0.25", None),
    row(0.30, "0.3", None),
    row(0.35, "0.35", Some("10BA")),
    row(0.39, "0.39", Some("9BA")),
    row(0.40, "0.4", None),
    row(0.43, "0.43", Some("8BA")),
    row(0.45, "0.45", None),
    row(0.48, "0.48", Some("7BA")),
    row(0.50, "0.5", None),
    row(0.53, "0.53", Some("6BA")),
    row(0.55, "0.55", None),
    row(0.59, "0.59", Some("5BA")),
    row(0.60, "0.6", None),
    row(0.65, "0.65", None),
    row(0.66, "0.66", Some("4BA")),
    row(0.70, "0.7", None),
    row(0.73, "0.73", Some("3BA")),
    row(0.75, "0.75", None),
    row(0.80, "0.8", None),
    row(0.81, "0.81", Some("2BA")),
    row(0.90, "0.9", Some("1BA")),
    row(1.00, "1.0", Some("0BA")),
    row(1.10, "1.1", None),
    row(1.20, "1.2", None),
    row(1.25, "1.25", None),
    row(1.30, "1.3", None),
    row(1.40, "1.4", None),
    row(1.50, "1.5", None),
    row(1.75, "1.75", None),
    row(2.00, "2.0", None),
    row(2.25, "2.25", None),
    row(2.50, "2.5", None),
    row(2.75, "2.75", None),
    row(3.00, "3.0", None),
    row(3.25, "3.25", None),
    row(3.50, "3.5", None),
    row(4.00, "4.0", None),
    row(4.50, "4.5", None),
    row(5.00, "5.0", None),
    row(5.50, "5.5", None),
    row(6.00, "6.0", None),
    row(6.50, "6.5", None),
];

/// Diametral pitch; rate in inches per revolution.
pub(crate) const DIAMETRAL: [PitchRow; 38] = [
    row(120.0, "0.0262", Some("120")),
    row(112.0, "0.0280", Some("112")),
    row(108.0, "0.0291", Some("108")),
    row(104.0, "0.0302", Some("104")),
    row(96.0, "0.0327", Some("96")),
    row(92.0, "0.0341", Some("92")),
    row(88.0, "0.0357", Some("88")),
    row(80.0, "0.0393", Some("80")),
    row(76.0, "0.0413", Some("76")),
    row(72.0, "0.0436", Some("72")),
    row(64.0, "0.0491", Some("64")),
    row(60.0, "0.0524", Some("60")),
    row(56.0, "0.0561", Some("56")),
    row(54.0, "0.0582", Some("54")),
    row(52.0, "0.0604", Some("52")),
    row(48.0, "0.0654", Some("48")),
    row(46.0, "0.0683", Some("46")),
    row(44.0, "0.0714", Some("44")),
    row(40.0, "0.0785", Some("40")),
    row(38.0, "0.0827", Some("38")),
    row(36.0, "0.0873", Some("36")),
    row(32.0, "0.0912", Some("32")),
    row(30.0, "0.1041", Some("30")),
    row(28.0, "0.1122", Some("28")),
    row(27.0, "0.1164", Some("27")),
    row(26.0, "0.1208", Some("26")),
    row(24.0, "0.1309", Some("24")),
    row(23.0, "0.1366", Some("23")),
    row(22.0, "0.1428", Some("22")),
    row(20.0, "0.1571", Some("20")),
    row(19.0, "0.1653", Some("19")),
    row(18.0, "0.1745", Some("18")),
    row(16.0, "0.1963", Some("16")),
    row(15.0, "0.2094", Some("15")),
    row(14.0, "0.2244", Some("14")),
    row(13.5, "0.2327", Some("13½")),
    row(13.0, "0.2417", Some("13")),
    row(12.0, "0.2618", Some("12")),
];

/// Module in millimetres.
pub(crate) const MODULE: [PitchRow; 26] = [
    row(0.20, "0.2", None),
    row(0.25, "0.25", None),
    row(0.30, "0.3", None),
    row(0.35, "0.35", None),
    row(0.40, "0.4", None),
    row(0.45, "0.45", None),
    row(0.50, "0.5", None),
    row(0.55, "0.55", None),
    row(0.60, "0.6", None),
    row(0.65, "0.65", None),
    row(0.70, "0.7", None),
    row(0.80, "0.8", None),
    row(0.90, "0.9", None),
    row(0.95, "0.95", None),
    row(1.00, "1.0", None),
    row(1.10, "1.1", None),
    row(1.20, "1.2", None),
    row(1.25, "1.25", None),
    row(1.30, "1.3", None),
    row(1.40, "1.4", None),
    row(1.50, "1.5", None),
    row(1.60, "1.6", None),
    row(1.75, "1.75", None),
    row(1.80, "1.8", None),
    row(1.90, "1.9", None),
    row(2.00, "2.0", None),
];
