//! Command-line arguments for the `landslide` binary.

use clap::{Args, Parser, Subcommand};

use crate::domain::{FilterField, Impact, LandslideSource, LandslideType, QueryFilter, Wea13Type};

/// `landslide` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "landslide",
    about = "Sign in, query and report landslides against the landslide backend",
    version
)]
pub struct CliArgs {
    /// Backend origin. Overrides `LANDSLIDE_BASE_URL`.
    #[arg(long = "base-url", value_name = "url", global = true)]
    pub base_url: Option<String>,
    /// Token file. Overrides `LANDSLIDE_SESSION_FILE`.
    #[arg(long = "session-file", value_name = "path", global = true)]
    pub session_file: Option<String>,
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported actions.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and remember the session.
    SignIn(SignInArgs),
    /// Create an account, then sign in with it.
    SignUp(SignUpArgs),
    /// Forget the remembered session.
    SignOut,
    /// Show the signed-in user.
    Whoami,
    /// Search reported landslides.
    Query(QueryArgs),
    /// Report a landslide at a map point.
    Report(ReportArgs),
    /// Show the identifier the next report would use.
    NextId,
}

/// Arguments for `sign-in`.
#[derive(Debug, Clone, Args)]
pub struct SignInArgs {
    /// Account email address.
    #[arg(long, value_name = "email", default_value = "")]
    pub email: String,
    /// Account password.
    #[arg(
        long,
        value_name = "password",
        env = "LANDSLIDE_PASSWORD",
        hide_env_values = true,
        default_value = ""
    )]
    pub password: String,
}

/// Arguments for `sign-up`.
#[derive(Debug, Clone, Args)]
pub struct SignUpArgs {
    /// Display name for the new account.
    #[arg(long, value_name = "name", default_value = "")]
    pub username: String,
    /// Account email address.
    #[arg(long, value_name = "email", default_value = "")]
    pub email: String,
    /// Account password.
    #[arg(
        long,
        value_name = "password",
        env = "LANDSLIDE_PASSWORD",
        hide_env_values = true,
        default_value = ""
    )]
    pub password: String,
}

/// Arguments for `query`. Every filter is optional; blank values are ignored.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Exact landslide identifier.
    #[arg(long = "landslide-id", value_name = "id")]
    pub landslide_id: Option<String>,
    /// Inclusive lower latitude bound.
    #[arg(long = "min-lat", value_name = "degrees", allow_hyphen_values = true)]
    pub min_latitude: Option<String>,
    /// Inclusive upper latitude bound.
    #[arg(long = "max-lat", value_name = "degrees", allow_hyphen_values = true)]
    pub max_latitude: Option<String>,
    /// Inclusive lower longitude bound.
    #[arg(long = "min-lng", value_name = "degrees", allow_hyphen_values = true)]
    pub min_longitude: Option<String>,
    /// Inclusive upper longitude bound.
    #[arg(long = "max-lng", value_name = "degrees", allow_hyphen_values = true)]
    pub max_longitude: Option<String>,
    /// Landslide type.
    #[arg(long = "type", value_name = "type")]
    pub landslide_type: Option<String>,
    /// Landslide source.
    #[arg(long = "source", value_name = "source")]
    pub landslide_source: Option<String>,
    /// Impact classification.
    #[arg(long, value_name = "impact")]
    pub impact: Option<String>,
    /// Secondary classification identifier.
    #[arg(long = "wea13-id", value_name = "id")]
    pub wea13_id: Option<String>,
    /// Secondary classification type.
    #[arg(long = "wea13-type", value_name = "type")]
    pub wea13_type: Option<String>,
    /// Exact point as `"lon lat"`.
    #[arg(long, value_name = "lon lat", allow_hyphen_values = true)]
    pub coordinates: Option<String>,
    /// Print a GeoJSON `FeatureCollection` instead of a table.
    #[arg(long)]
    pub geojson: bool,
}

impl QueryArgs {
    /// Build the canonical filter from the supplied flags.
    pub fn to_filter(&self) -> QueryFilter {
        let values = [
            (FilterField::LandslideId, &self.landslide_id),
            (FilterField::MinLatitude, &self.min_latitude),
            (FilterField::MaxLatitude, &self.max_latitude),
            (FilterField::MinLongitude, &self.min_longitude),
            (FilterField::MaxLongitude, &self.max_longitude),
            (FilterField::LandslideType, &self.landslide_type),
            (FilterField::LandslideSource, &self.landslide_source),
            (FilterField::Impact, &self.impact),
            (FilterField::Wea13Id, &self.wea13_id),
            (FilterField::Wea13Type, &self.wea13_type),
            (FilterField::Coordinates, &self.coordinates),
        ];
        values
            .into_iter()
            .fold(QueryFilter::default(), |filter, (field, value)| match value {
                Some(text) => filter.with(field, text.as_str()),
                None => filter,
            })
    }
}

/// Arguments for `report`.
///
/// Selections stay optional here so missing ones surface as the form's own
/// prompt rather than a clap usage error.
#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Latitude of the map point.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    pub lat: f64,
    /// Longitude of the map point.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    pub lng: f64,
    /// Landslide type.
    #[arg(long = "type", value_name = "type")]
    pub ls_type: Option<LandslideType>,
    /// Landslide source.
    #[arg(long = "source", value_name = "source")]
    pub ls_source: Option<LandslideSource>,
    /// Observed impact.
    #[arg(long, value_name = "impact")]
    pub impact: Option<Impact>,
    /// Secondary classification type.
    #[arg(long = "wea13-type", value_name = "type")]
    pub wea13_type: Option<Wea13Type>,
    /// Secondary classification identifier.
    #[arg(long = "wea13-id", value_name = "id", default_value = "")]
    pub wea13_id: String,
}
