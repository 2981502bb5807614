use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Metadata block is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
