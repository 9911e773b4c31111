//! Common test fixtures for discussion mapper tests.
//!
//! Sample pages follow the layout of real SPC mesoscale discussions and WPC
//! mesoscale precipitation discussions: a `<pre>` block whose third
//! non-blank line ends with the issuance date, a `Valid DDHHMMZ - DDHHMMZ`
//! line, and a trailing `LAT...LON` block of 8-digit tokens.

/// Sample discussion documents.
pub mod discussion {
    /// SPC mesoscale discussion page. The ring is self-closing.
    pub const SPC_MD_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>SPC - Storm Prediction Center: Mesoscale Discussion 0123</title></head>
<body>
<table><tr><td><a href="/products/md/">Mesoscale Discussion Index</a></td></tr></table>
<center><img src="mcd0123.png" alt="Mesoscale Discussion 123 Graphic"></center>
<pre>

   Mesoscale Discussion 0123
   NWS Storm Prediction Center Norman OK
   0245 PM CST Fri Jan 05 2024

   Areas affected...central and eastern New York

   Concerning...Heavy snow

   Valid 052045Z - 060045Z

   SUMMARY...Snowfall rates of 1-2 inches per hour are expected to
   spread east across the Mohawk Valley through the evening.

   ..Smith.. 01/05/2024

   ...Please see www.spc.noaa.gov for graphic product...

   ATTN...WFO...ALY...BGM...BUF...

   LAT...LON   42127648 43207510 43117391 42397386 41967512 42127648

</pre>
</body>
</html>
"#;

    /// Vertices encoded in [`SPC_MD_HTML`], as (lat, lon), closing vertex included.
    pub const SPC_MD_VERTICES: [(f64, f64); 6] = [
        (42.12, -76.48),
        (43.20, -75.10),
        (43.11, -73.91),
        (42.39, -73.86),
        (41.96, -75.12),
        (42.12, -76.48),
    ];

    /// WPC mesoscale precipitation discussion page. The ring is not closed
    /// in the text.
    pub const WPC_MPD_HTML: &str = r#"<html>
<body>
<div id="header">Weather Prediction Center</div>
<pre>
Mesoscale Precipitation Discussion 0612
NWS Weather Prediction Center College Park MD
1130 AM EDT Sat Jul 13 2024

Areas affected...Southern Tier of New York

Concerning...Heavy rainfall...Flash flooding possible

Valid 131530Z - 132130Z

SUMMARY...Training convection may produce rainfall rates of 2"/hr.

ATTN...WFO...BGM...

LAT...LON   42707700 42527551 42017552 42077714
</pre>
</body>
</html>
"#;

    /// Raw coordinate text as pasted by a user.
    pub const RAW_LAT_LON: &str =
        "LAT...LON   42127648 43207510 43117391 42397386 41967512 42127648";

    /// Preformatted block without enough lines to carry an issuance date.
    pub const SHORT_PRE_HTML: &str = "<html><body><pre>\nMesoscale Discussion 0001\n</pre></body></html>";

    /// Page carrying valid times and coordinates but no `<pre>` product block.
    pub const NO_PRE_HTML: &str = "<html><body><p>Valid 052045Z - 060045Z</p>\
        <p>\nLAT...LON 42127648 43207510 43117391 42397386 41967512 42127648</p></body></html>";
}

/// World file contents.
pub mod world_file {
    /// World file for the national n0q composite (0.005 degree pixels).
    pub const N0Q_CONUS: &str = "0.005000000000\n0.00\n0.00\n-0.005000000000\n-126.000000\n50.000000\n";

    /// Small test transform: 0.01 degree pixels anchored at (-80, 45).
    pub const SMALL: &str = "0.01\n0\n0\n-0.01\n-80.0\n45.0\n";

    /// Rotated georeference.
    pub const ROTATED: &str = "0.01\n0.001\n0\n-0.01\n-80.0\n45.0\n";

    /// Truncated world file (five coefficients).
    pub const TRUNCATED: &str = "0.01\n0\n0\n-0.01\n-80.0\n";

    /// Upper-left latitude is NaN.
    pub const NAN_ORIGIN: &str = "0.01\n0\n0\n-0.01\n-80.0\nNaN\n";

    /// Zero-height pixels.
    pub const ZERO_PIXEL: &str = "0.01\n0\n0\n0\n-80.0\n45.0\n";
}

/// Common bounding box definitions for testing.
pub mod bbox {
    /// Extent of the n0q CONUS composite (12200 x 5400 pixels).
    pub const N0Q_CONUS: (f64, f64, f64, f64) = (-126.0, 23.0, -65.0, 50.0);
}
