//! Analysis resource client
//!
//! This module provides the bulletin analysis operation and the typed view
//! of the report the service produces.

use crate::client::{CallResult, HttpClient};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Path of the analysis operation
pub const ANALYZE_PATH: &str = "/analyze";

/// Client for analysis operations
#[derive(Debug, Clone, Copy)]
pub struct AnalysisClient<'a> {
    client: &'a HttpClient,
}

impl<'a> AnalysisClient<'a> {
    /// Create a new analysis client
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Request the analysis of the bulletin published on `request.date`.
    ///
    /// The reply must be a `{success, data}` envelope; anything else is
    /// reported as a `ClientRequestError` with code `API_ERROR`.
    pub async fn analyze(&self, request: &AnalysisRequest) -> CallResult<AnalysisReport> {
        self.client.post_enveloped(ANALYZE_PATH, request).await
    }

    /// Same as [`analyze`](Self::analyze) but returns the payload untouched
    pub async fn analyze_raw(&self, request: &AnalysisRequest) -> CallResult<Value> {
        self.client.post_enveloped(ANALYZE_PATH, request).await
    }
}

/// Request to analyze the bulletin of one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Publication date of the bulletin
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    /// Ignore any stored analysis and run a fresh one
    #[serde(rename = "forzar_reanalisis", default)]
    pub force_reanalysis: bool,
}

/// A date the service cannot have a bulletin for
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Date {date} is in the future. No bulletin is available yet.")]
pub struct FutureDateError {
    /// The rejected date
    pub date: NaiveDate,
}

impl AnalysisRequest {
    /// Create a new analysis request
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            force_reanalysis: false,
        }
    }

    /// Ask for a fresh analysis even if one is stored
    pub fn with_force_reanalysis(mut self, force: bool) -> Self {
        self.force_reanalysis = force;
        self
    }

    /// Reject dates after `today`
    pub fn validate(&self, today: NaiveDate) -> Result<(), FutureDateError> {
        if self.date > today {
            return Err(FutureDateError { date: self.date });
        }
        Ok(())
    }
}

/// Complete analysis report for one bulletin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Bulletin date as sent back by the service
    #[serde(rename = "fecha", default)]
    pub date: String,
    /// Bulletin section that was analyzed
    #[serde(rename = "seccion", default)]
    pub section: Option<String>,
    /// Source document address
    #[serde(default)]
    pub pdf_url: Option<String>,
    /// Analysis body
    #[serde(rename = "analisis", default)]
    pub analysis: BulletinAnalysis,
    /// Opinions collected from the press and specialists
    #[serde(rename = "opiniones_expertos", default)]
    pub expert_opinions: Vec<ExpertOpinion>,
    /// Processing metadata
    #[serde(rename = "metadatos", default)]
    pub metadata: AnalysisMetadata,
}

impl AnalysisReport {
    /// Whether the service answered from its stored analyses
    pub fn from_cache(&self) -> bool {
        self.metadata.from_cache
    }
}

/// Summary, changes, affected areas and impact of one bulletin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulletinAnalysis {
    /// Plain language summary of the day
    #[serde(rename = "resumen", default)]
    pub summary: String,
    /// Most relevant instruments published
    #[serde(rename = "cambios_principales", default)]
    pub key_changes: Vec<NormativeChange>,
    /// Overall impact assessment
    #[serde(rename = "impacto_estimado", default)]
    pub estimated_impact: String,
    /// Areas of law or activity touched by the changes
    #[serde(rename = "areas_afectadas", default)]
    pub affected_areas: Vec<String>,
}

/// One legal instrument published in the bulletin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormativeChange {
    /// decreto, resolución, ley, disposición...
    #[serde(rename = "tipo", default)]
    pub kind: String,
    /// Official number, such as `1103/2024`
    #[serde(rename = "numero", default)]
    pub number: String,
    /// Full heading of the instrument
    #[serde(rename = "rotulo", default)]
    pub heading: String,
    /// Short title
    #[serde(rename = "titulo", default)]
    pub title: String,
    /// What the instrument changes
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Impact rating
    #[serde(rename = "impacto", default)]
    pub impact: ImpactLevel,
    /// Reasoning behind the rating
    #[serde(rename = "justificacion_impacto", default)]
    pub impact_rationale: String,
}

/// Impact rating of a change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    /// alto
    #[serde(rename = "alto")]
    High,
    /// medio
    #[default]
    #[serde(rename = "medio")]
    Medium,
    /// bajo
    #[serde(rename = "bajo")]
    Low,
    /// Missing or any other label
    #[serde(other, rename = "no_especificado")]
    Unspecified,
}

impl ImpactLevel {
    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            ImpactLevel::High => "high",
            ImpactLevel::Medium => "medium",
            ImpactLevel::Low => "low",
            ImpactLevel::Unspecified => "unspecified",
        }
    }
}

/// An opinion piece found for the bulletin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpertOpinion {
    /// Outlet or portal
    #[serde(rename = "medio", alias = "fuente", default)]
    pub outlet: String,
    /// Link to the piece
    #[serde(default)]
    pub url: Option<String>,
    /// Author, when known
    #[serde(rename = "autor", default)]
    pub author: Option<String>,
    /// Headline
    #[serde(rename = "titulo", default)]
    pub title: String,
    /// Summary of the opinion
    #[serde(rename = "opinion_resumen", alias = "opinion", default)]
    pub summary: String,
    /// Publication date as the outlet gives it
    #[serde(rename = "fecha_publicacion", alias = "fecha_opinion", default)]
    pub published_on: Option<String>,
    /// alta, media or baja
    #[serde(rename = "relevancia", default)]
    pub relevance: Option<String>,
}

/// Processing metadata attached to a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Served from stored analyses
    #[serde(rename = "desde_cache", default)]
    pub from_cache: bool,
    /// Model that produced the analysis
    #[serde(rename = "modelo_llm_usado", default)]
    pub model: Option<String>,
    /// Analysis format version
    #[serde(rename = "version_analisis", default)]
    pub version: Option<String>,
    /// Seconds the service spent producing the report
    #[serde(rename = "tiempo_procesamiento", default)]
    pub processing_time: Option<f64>,
    /// Processing state
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
    /// How the analysis was produced
    #[serde(rename = "metodo_analisis", default)]
    pub method: Option<String>,
}
