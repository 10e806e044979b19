use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use mvnmeta::artifact::Coordinate;
use mvnmeta::auth::Credential;
use mvnmeta::config::VersionListConfig;
use mvnmeta::fetch::MetadataFetcher;
use mvnmeta::probe::ArtifactInfoProbe;
use mvnmeta::resolver::Resolver;
use mvnmeta::{Repository, Version};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Clone)]
struct ResolveTarget {
    coordinate: Coordinate,
    version: Version,
}

/// `groupId:artifactId[:packaging[:classifier]]:version` — the version is
/// always the last segment and may be a symbolic token (FIRST, LAST, LATEST,
/// RELEASE).
fn parse_target(input: &str) -> Result<ResolveTarget, String> {
    let parts: Vec<_> = input.split(":").collect();
    let (coordinate, version) = match parts.as_slice() {
        [g, a, v] => (format!("{}:{}", g, a), v),
        [g, a, p, v] => (format!("{}:{}:{}", g, a, p), v),
        [g, a, p, c, v] => (format!("{}:{}:{}:{}", g, a, p, c), v),
        _ => {
            return Err(format!(
                "Expected groupId:artifactId[:packaging[:classifier]]:version, got {}",
                input
            ));
        }
    };
    let coordinate = Coordinate::parse(&coordinate).map_err(|e| e.to_string())?;
    Ok(ResolveTarget {
        coordinate,
        version: Version::from(*version),
    })
}

#[derive(Parser)]
#[command(version, about, long_about, arg_required_else_help = true)]
struct Cli {
    /// Repository base URL; falls back to MVNMETA_REPOSITORY, then Maven
    /// Central.
    #[arg(long, global = true)]
    repo: Option<Url>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// List the published versions of a coordinate
    Versions {
        #[arg(value_parser=Coordinate::parse, help = "groupId:artifactId")]
        coordinates: Coordinate,
        /// Regular expression a version must fully match to be listed
        #[arg(long, default_value = "")]
        filter: String,
        /// ASC keeps repository order, DESC reverses it
        #[arg(long, default_value = "DESC")]
        sort: String,
        /// Maximum number of versions to list; non-numeric means unlimited
        #[arg(long, default_value = "")]
        max: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve one version of a coordinate to its download URL
    Resolve {
        #[arg(value_parser=parse_target, help = "groupId:artifactId[:packaging[:classifier]]:version")]
        target: ResolveTarget,
        /// Print the full env-var projection under this parameter name
        /// instead of the bare URL
        #[arg(long)]
        env_prefix: Option<String>,
    },
    /// Report the currently deployed artifact from a status URL
    Probe {
        #[arg()]
        url: String,
        #[arg(long)]
        label: Option<String>,
        /// Regular expression searched in the body; the first capture group
        /// (or the whole match) becomes the reported value
        #[arg(long)]
        pattern: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let repo = match &cli.repo {
        Some(url) => Repository::new(url.clone()),
        None => match std::env::var("MVNMETA_REPOSITORY").ok() {
            Some(r) => Url::parse(&r)
                .context(format!("Unable to parse {}", r))
                .map(Repository::new)?,
            None => Repository::maven_central(),
        },
    };
    let credential = credential_from_env();
    let fetcher = MetadataFetcher::new()?;
    let resolver = Resolver::new(&fetcher, &repo);

    match cli.command {
        Some(Commands::Versions {
            coordinates,
            filter,
            sort,
            max,
            json,
        }) => {
            let config = VersionListConfig {
                filter,
                sort_order: sort,
                max_versions: max,
                ..VersionListConfig::default()
            };
            config.validate()?;
            let versions = resolver.versions(&coordinates, &config, credential.as_ref())?;
            if json {
                serde_json::to_writer_pretty(std::io::stdout(), &versions)?;
            } else {
                for version in versions {
                    println!("{}", version);
                }
            }
            Ok(())
        }
        Some(Commands::Resolve { target, env_prefix }) => {
            let version = match target.version.as_ref() {
                "FIRST" | "LAST" | "LATEST" | "RELEASE" => {
                    let config = VersionListConfig {
                        default_value: target.version.to_string(),
                        ..VersionListConfig::default()
                    };
                    let Some(selected) =
                        resolver.default_version(&target.coordinate, &config, credential.as_ref())?
                    else {
                        bail!("no version available for {}", target.version);
                    };
                    selected
                }
                _ => target.version.clone(),
            };

            let descriptor = resolver.resolve(&target.coordinate, &version, credential.as_ref());
            match env_prefix {
                Some(name) => {
                    for (key, value) in descriptor.env_vars(&name) {
                        println!("{}={}", key, value);
                    }
                }
                None => println!("{}", descriptor.url),
            }
            Ok(())
        }
        Some(Commands::Probe {
            url,
            label,
            pattern,
        }) => {
            let probe = ArtifactInfoProbe::new(url, label.as_deref(), pattern.as_deref())
                .context("invalid probe pattern")?;
            println!("{}", probe.probe(&fetcher, credential.as_ref()));
            Ok(())
        }
        None => Ok(()),
    }
}

fn credential_from_env() -> Option<Credential> {
    let username = std::env::var("MVNMETA_USERNAME").ok()?;
    let password = std::env::var("MVNMETA_PASSWORD").ok()?;
    Some(Credential::new(username, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_target_with_version() {
        let target = parse_target("com.acme:foo:1.0").unwrap();
        assert_eq!(target.coordinate.to_string(), "com.acme:foo:jar");
        assert_eq!(target.version, Version::from("1.0"));
    }

    #[test]
    fn parses_target_with_packaging_and_classifier() {
        let target = parse_target("com.acme:foo:war:classes:3.8-SNAPSHOT").unwrap();
        assert_eq!(target.coordinate.to_string(), "com.acme:foo:war:classes");
        assert_eq!(target.version, Version::from("3.8-SNAPSHOT"));
    }

    #[test]
    fn rejects_target_without_version() {
        assert!(parse_target("com.acme:foo").is_err());
    }
}
