use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "wlm",
    about = "WeLoveMovies: fold flat join rows into nested records",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Group rows into one nested record per group key
    Group {
        /// Shape file (TOML, or JSON with a .json extension)
        #[arg(long)]
        shape: String,

        /// Rows as a JSON array or JSONL (`-` for stdin)
        #[arg(long, default_value = "-")]
        rows: String,

        /// Override the shape's group key
        #[arg(long)]
        key: Option<String>,

        /// Output as one JSON document
        #[arg(long)]
        json: bool,
    },

    /// Move each row's fields to their configured paths
    Map {
        /// Shape file; placeholders are not allowed
        #[arg(long)]
        shape: String,

        /// Rows as a JSON array or JSONL (`-` for stdin)
        #[arg(long, default_value = "-")]
        rows: String,

        /// Output as one JSON document
        #[arg(long)]
        json: bool,
    },

    /// Expand grouped records back into flat rows
    Flatten {
        /// Shape file used to group the records
        #[arg(long)]
        shape: String,

        /// Grouped records as a JSON array or JSONL (`-` for stdin)
        #[arg(long, default_value = "-")]
        input: String,

        /// Output as one JSON document
        #[arg(long)]
        json: bool,
    },

    /// Validate a shape file
    ShapeCheck {
        /// Shape file to check
        #[arg(long)]
        shape: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fold rows with a built-in WeLoveMovies shape
    Catalog {
        /// Which join the rows come from
        view: CatalogView,

        /// Rows as a JSON array or JSONL (`-` for stdin)
        #[arg(long, default_value = "-")]
        rows: String,

        /// Output the `{ "data": ... }` response body
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CatalogView {
    /// theaters ⋈ movies_theaters ⋈ movies
    #[value(name = "theaters")]
    Theaters,
    /// reviews ⋈ critics, one review
    #[value(name = "review")]
    Review,
    /// reviews ⋈ critics for one movie, `critic:*` aliases
    #[value(name = "movie-reviews")]
    MovieReviews,
}
