//! Cloud Firestore integration
//!
//! Thin client for the Firestore REST API (v1) covering the document
//! operations the quotes API needs: listing a collection, running a
//! single-filter structured query, overwriting a document by id and adding a
//! document with a generated id.

pub mod client;
mod models;

pub use client::{FirestoreClient, FirestoreConfig, FirestoreError};
pub use models::{
    ArrayValue, CollectionSelector, Document, FieldFilter, FieldOperator, FieldReference, Filter,
    LatLng, MapValue, RunQueryRequest, StructuredQuery, Value,
};
