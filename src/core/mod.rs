pub mod assembler;
pub mod ats_score;
pub mod document_parser;
pub mod education;
pub mod enhancer;
pub mod errors;
pub mod experience;
pub mod generative;
pub mod models;
pub mod ner;
pub mod normalization;
pub mod normalizer;
pub mod ocr;
pub mod patterns;
pub mod pdf;
pub mod personal_info;
pub mod sections;
pub mod service;
pub mod settings_store;
pub mod skills;
pub mod summary;
