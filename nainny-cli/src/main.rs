//! Nainny CLI - analyse, score and adapt children's stories

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;

use nainny_core::adaptation::{AdaptationHints, AdaptiveStoryteller};
use nainny_core::config::{AGE_RANGES, NainnyConfig, is_valid_age_range};
use nainny_core::culture::{
    CulturalAnalyzer, CulturalKnowledgeSource, EmbeddedKnowledgeBase, FileKnowledgeBase,
};
use nainny_core::embeddings::EmbeddingProviderFactory;
use nainny_core::enrichment::ConceptEnricher;
use nainny_core::evaluation::StoryEvaluator;
use nainny_core::llm::LLMProviderFactory;
use nainny_core::story::{InMemoryStoryRepository, StoryParser};
use nainny_core::text::LanguageModel;

#[derive(Parser)]
#[command(name = "nainny")]
#[command(about = "Children's story analysis and cultural adaptation", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to nainny.toml and NAINNY_ env vars)
    #[arg(long, global = true, env = "NAINNY_CONFIG")]
    config: Option<PathBuf>,

    /// Never call external services
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a story and print its analysis
    Analyze {
        /// Story text file
        file: PathBuf,
        /// Story title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,
        /// Attach ConceptNet relations to important concepts
        #[arg(long)]
        enrich: bool,
    },
    /// Score how well a story fits a culture
    CultureFit {
        file: PathBuf,
        /// Target culture (defaults to the configured culture)
        #[arg(short, long)]
        culture: Option<String>,
        /// Target age range, e.g. 6-8
        #[arg(short, long, value_parser = parse_age_range)]
        age: Option<String>,
    },
    /// Rewrite a story for a culture and age group
    Adapt {
        file: PathBuf,
        #[arg(short, long)]
        culture: String,
        /// Target age range, e.g. 3-5
        #[arg(short, long, value_parser = parse_age_range)]
        age: String,
        /// Term replacement, as FROM=TO
        #[arg(long = "hint", value_parser = parse_hint)]
        hints: Vec<(String, String)>,
        /// Fill hints from the knowledge base mappings of the story's concepts
        #[arg(long)]
        auto_hints: bool,
    },
    /// Score an adapted story against its original
    Evaluate {
        original: PathBuf,
        adapted: PathBuf,
        #[arg(short, long)]
        culture: String,
    },
    /// Map a concept into the target culture
    Map {
        concept: String,
        /// Culture the concept comes from
        #[arg(long, default_value = "western")]
        from: String,
        #[arg(short, long)]
        culture: Option<String>,
    },
    /// Show a festival from the knowledge base
    Festival {
        name: String,
        #[arg(short, long)]
        culture: Option<String>,
    },
    /// Version information
    Version,
}

fn parse_hint(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((from, to)) if !from.trim().is_empty() => {
            Ok((from.trim().to_string(), to.trim().to_string()))
        }
        _ => Err(format!("expected FROM=TO, got '{}'", raw)),
    }
}

fn parse_age_range(raw: &str) -> std::result::Result<String, String> {
    if is_valid_age_range(raw) {
        Ok(raw.to_string())
    } else {
        Err(format!("expected one of {}, got '{}'", AGE_RANGES.join(", "), raw))
    }
}

fn load_config(path: Option<&Path>, offline: bool) -> Result<NainnyConfig> {
    let mut config = match path {
        Some(path) => NainnyConfig::from_file(path)?,
        None => NainnyConfig::load()?,
    };
    if offline {
        config.enrichment.offline = true;
    }
    Ok(config)
}

async fn read_story(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn enricher(config: &NainnyConfig) -> Result<Arc<ConceptEnricher>> {
    Ok(Arc::new(ConceptEnricher::from_config(&config.enrichment)?))
}

async fn cultural_analyzer(
    config: &NainnyConfig,
    culture: Option<&str>,
    enricher: Option<Arc<ConceptEnricher>>,
) -> Result<CulturalAnalyzer> {
    let culture = culture.unwrap_or(&config.culture.default_culture);
    let source: Box<dyn CulturalKnowledgeSource> = match &config.knowledge_base.path {
        Some(path) => Box::new(FileKnowledgeBase::new(path)),
        None => Box::new(EmbeddedKnowledgeBase::seeded()),
    };
    Ok(CulturalAnalyzer::load(source.as_ref(), culture, enricher).await?)
}

fn story_parser(config: &NainnyConfig) -> Result<StoryParser> {
    let model = LanguageModel::load();
    model.health_check()?;
    Ok(StoryParser::new(
        model,
        Arc::new(InMemoryStoryRepository::new()),
        config,
    )?)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("nainny {}", env!("CARGO_PKG_VERSION"));
        println!("nainny-core {}", nainny_core::VERSION);
        return Ok(());
    }

    let config = load_config(cli.config.as_deref(), cli.offline)?;

    match cli.command {
        Commands::Version => {}
        Commands::Analyze { file, title, enrich } => {
            let text = read_story(&file).await?;
            let title = title.unwrap_or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Untitled".to_string())
            });

            let mut parser = story_parser(&config)?;
            if enrich {
                parser = parser.with_enricher(enricher(&config)?);
            }
            let story = parser.create_story(&title, &text).await?;
            let analysis = parser.analyze_stored(story.id, enrich).await?;
            print_json(&analysis)?;
        }
        Commands::CultureFit { file, culture, age } => {
            let text = read_story(&file).await?;
            let analysis = story_parser(&config)?
                .parse_story(&text, "story", false)
                .await?;
            let analyzer = cultural_analyzer(&config, culture.as_deref(), None).await?;
            let report = analyzer.analyze_cultural_fit(&text, &analysis.concepts, age.as_deref());
            print_json(&report)?;
        }
        Commands::Adapt {
            file,
            culture,
            age,
            hints,
            auto_hints,
        } => {
            let text = read_story(&file).await?;
            tracing::info!(culture = %culture, age = %age, "Adapting story");
            let mut map = AdaptationHints::new();

            if auto_hints {
                let analysis = story_parser(&config)?.parse_story(&text, "story", false).await?;
                let analyzer =
                    cultural_analyzer(&config, Some(&culture), Some(enricher(&config)?)).await?;
                let concepts: Vec<&str> = analysis.concepts.iter().map(|c| c.text.as_str()).collect();
                for (source, alternative) in analyzer.suggest_alternatives(&concepts).await {
                    map.insert(source, Value::String(alternative.primary));
                }
            }
            for (from, to) in hints {
                map.insert(from, Value::String(to));
            }

            let generator = LLMProviderFactory::from_config(config.llm.as_ref())?;
            let max_tokens = config.llm.as_ref().map(|l| l.max_new_tokens);
            let mut storyteller = AdaptiveStoryteller::new(generator);
            if let Some(tokens) = max_tokens {
                storyteller = storyteller.with_max_new_tokens(tokens);
            }

            let adapted = storyteller
                .adapt(&text, &culture, &age, (!map.is_empty()).then_some(&map))
                .await;
            print_json(&adapted)?;
        }
        Commands::Evaluate {
            original,
            adapted,
            culture,
        } => {
            let original = read_story(&original).await?;
            let adapted = read_story(&adapted).await?;
            let embedder = EmbeddingProviderFactory::from_config(config.embeddings.as_ref())?;
            let scores = StoryEvaluator::new(embedder)
                .evaluate(&original, &adapted, &culture)
                .await;
            print_json(&scores)?;
        }
        Commands::Map {
            concept,
            from,
            culture,
        } => {
            let analyzer =
                cultural_analyzer(&config, culture.as_deref(), Some(enricher(&config)?)).await?;
            match analyzer.find_concept_mapping(&concept, &from).await {
                Some(mapping) => print_json(&mapping)?,
                None => {
                    let similar = analyzer.find_similar_cultural_concepts(&concept);
                    if similar.is_empty() {
                        bail!("No mapping found for '{}'", concept);
                    }
                    print_json(&serde_json::json!({ "concept": concept, "similar": similar }))?;
                }
            }
        }
        Commands::Festival { name, culture } => {
            let analyzer = cultural_analyzer(&config, culture.as_deref(), None).await?;
            match analyzer.get_festival_context(&name) {
                Some(festival) => print_json(festival)?,
                None => bail!("No festival matching '{}'", name),
            }
        }
    }

    Ok(())
}
