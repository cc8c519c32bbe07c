//! RML mapping extractor
//!
//! Extracts TriplesMap definitions from a [`NodeGraph`].

use fluree_vocab::rdf;

use super::node_graph::{NodeGraph, NodeTerm};
use crate::error::{RmlError, RmlResult};
use crate::mapping::{
    ConstantValue, FunctionValue, JoinCondition, LanguageMap, LogicalSource, ObjectKind, ObjectMap,
    PredicateMap, PredicateObjectMap, RefObjectMap, ReferenceFormulation, SubjectKind, SubjectMap,
    Template, TermType, TriplesMap,
};
use crate::vocab::RML;

/// Extracts RML mappings from a node graph
pub struct MappingExtractor<'a> {
    /// The source graph
    graph: &'a NodeGraph,
}

impl<'a> MappingExtractor<'a> {
    /// Create a new extractor for the given graph
    pub fn new(graph: &'a NodeGraph) -> Self {
        Self { graph }
    }

    /// Extract all TriplesMap definitions from the graph
    ///
    /// A node is a TriplesMap when it is typed `rr:TriplesMap` or carries an
    /// `rml:logicalSource`. Graph order is preserved.
    pub fn extract_all(&self) -> RmlResult<Vec<TriplesMap>> {
        let mut triples_maps = Vec::new();

        for node in self.graph.nodes() {
            let typed = self
                .graph
                .objects(&node.id, rdf::TYPE)
                .any(|t| t.as_iri() == Some(RML::TRIPLES_MAP));
            let has_source = self.graph.object(&node.id, RML::LOGICAL_SOURCE).is_some();
            if typed || has_source {
                triples_maps.push(self.extract_triples_map(&node.id)?);
            }
        }

        Ok(triples_maps)
    }

    /// Extract a single TriplesMap by its identifier
    fn extract_triples_map(&self, tm_id: &str) -> RmlResult<TriplesMap> {
        let logical_source = self.extract_logical_source(tm_id)?;
        let subject_map = self.extract_subject_map(tm_id)?;
        let predicate_object_maps = self.extract_predicate_object_maps(tm_id)?;

        Ok(TriplesMap {
            iri: tm_id.to_string(),
            logical_source,
            subject_map,
            predicate_object_maps,
        })
    }

    /// Extract the logical source from a TriplesMap
    fn extract_logical_source(&self, tm_id: &str) -> RmlResult<LogicalSource> {
        let ls_id = self.find_node(tm_id, RML::LOGICAL_SOURCE)?;

        let source = self
            .graph
            .object(ls_id, RML::SOURCE)
            .and_then(NodeTerm::as_str)
            .ok_or_else(|| RmlError::MissingProperty(format!("rml:source in {}", tm_id)))?
            .to_string();

        let iterator = self
            .graph
            .object(ls_id, RML::ITERATOR)
            .and_then(NodeTerm::as_str)
            .map(str::to_string);

        let reference_formulation = match self.graph.object(ls_id, RML::REFERENCE_FORMULATION) {
            Some(term) => {
                let iri = term.as_iri().ok_or_else(|| RmlError::InvalidValue {
                    property: "rml:referenceFormulation".to_string(),
                    message: "expected IRI".to_string(),
                })?;
                ReferenceFormulation::from_iri(iri).ok_or_else(|| RmlError::InvalidValue {
                    property: "rml:referenceFormulation".to_string(),
                    message: format!("unsupported reference formulation {}", iri),
                })?
            }
            None => infer_formulation(&source),
        };

        Ok(LogicalSource {
            source,
            iterator,
            reference_formulation,
        })
    }

    /// Extract the subject map from a TriplesMap
    fn extract_subject_map(&self, tm_id: &str) -> RmlResult<SubjectMap> {
        let shortcuts: Vec<&NodeTerm> = self.graph.objects(tm_id, RML::SUBJECT).collect();
        let maps: Vec<&NodeTerm> = self.graph.objects(tm_id, RML::SUBJECT_MAP).collect();

        match shortcuts.len() + maps.len() {
            0 => {
                return Err(RmlError::MissingProperty(format!(
                    "rr:subjectMap in {}",
                    tm_id
                )))
            }
            1 => {}
            n => {
                return Err(RmlError::InvalidValue {
                    property: "rr:subjectMap".to_string(),
                    message: format!(
                        "{} declares {} subject maps, expected exactly one",
                        tm_id, n
                    ),
                })
            }
        }

        if let Some(subject) = shortcuts.first() {
            let iri = subject.as_node_id().ok_or_else(|| RmlError::InvalidValue {
                property: "rr:subject".to_string(),
                message: "expected IRI".to_string(),
            })?;
            return Ok(SubjectMap::constant(iri));
        }

        let sm_id = maps[0].as_node_id().ok_or_else(|| RmlError::InvalidValue {
            property: "rr:subjectMap".to_string(),
            message: "expected a subject map node".to_string(),
        })?;

        let mut variants: Vec<SubjectKind> = Vec::new();
        if let Some(reference) = self.reference(sm_id) {
            variants.push(SubjectKind::Reference(reference));
        }
        if let Some(template) = self.template(sm_id)? {
            variants.push(SubjectKind::Template(template));
        }
        if let Some(function) = self.function_value(sm_id)? {
            variants.push(SubjectKind::Function(Box::new(function)));
        }
        if let Some(constant) = self.graph.object(sm_id, RML::CONSTANT) {
            let iri = constant.as_str().ok_or_else(|| RmlError::InvalidValue {
                property: "rr:constant".to_string(),
                message: "expected IRI".to_string(),
            })?;
            variants.push(SubjectKind::Constant(iri.to_string()));
        }
        if variants.len() > 1 {
            return Err(RmlError::InvalidValue {
                property: "rr:subjectMap".to_string(),
                message: format!(
                    "unsupported combination of subject value sources in {}",
                    tm_id
                ),
            });
        }

        let mut subject_map = SubjectMap {
            kind: variants.pop().unwrap_or(SubjectKind::Blank),
            term_type: self.term_type(sm_id)?,
            classes: Vec::new(),
            class_function: None,
        };

        if subject_map.term_type == Some(TermType::Literal) {
            return Err(RmlError::InvalidTermType(format!(
                "subject map of {} cannot produce literals",
                tm_id
            )));
        }

        for class in self.graph.objects(sm_id, RML::CLASS) {
            match class {
                NodeTerm::Iri(iri) => subject_map.classes.push(iri.clone()),
                NodeTerm::Blank(node) => {
                    let function = self.function_value(node)?.ok_or_else(|| {
                        RmlError::InvalidValue {
                            property: "rr:class".to_string(),
                            message: "expected IRI or function value".to_string(),
                        }
                    })?;
                    if subject_map.class_function.is_some() {
                        return Err(RmlError::InvalidValue {
                            property: "rr:class".to_string(),
                            message: "at most one function-derived class is supported".to_string(),
                        });
                    }
                    subject_map.class_function = Some(function);
                }
                NodeTerm::Literal { value, .. } => subject_map.classes.push(value.clone()),
            }
        }

        Ok(subject_map)
    }

    /// Extract all predicate-object maps of a TriplesMap or function value
    fn extract_predicate_object_maps(&self, owner_id: &str) -> RmlResult<Vec<PredicateObjectMap>> {
        let mut poms = Vec::new();

        for pom in self.graph.objects(owner_id, RML::PREDICATE_OBJECT_MAP) {
            let pom_id = pom.as_node_id().ok_or_else(|| RmlError::InvalidValue {
                property: "rr:predicateObjectMap".to_string(),
                message: "expected a node".to_string(),
            })?;
            poms.push(self.extract_predicate_object_map(pom_id)?);
        }

        Ok(poms)
    }

    /// Extract a single predicate-object map
    fn extract_predicate_object_map(&self, pom_id: &str) -> RmlResult<PredicateObjectMap> {
        let mut predicates = Vec::new();
        for pred in self.graph.objects(pom_id, RML::PREDICATE) {
            let iri = pred.as_iri().ok_or_else(|| RmlError::InvalidValue {
                property: "rr:predicate".to_string(),
                message: "expected IRI".to_string(),
            })?;
            predicates.push(PredicateMap::Constant(iri.to_string()));
        }
        for pm in self.graph.objects(pom_id, RML::PREDICATE_MAP) {
            predicates.push(self.extract_predicate_map(pm)?);
        }
        if predicates.is_empty() {
            return Err(RmlError::MissingProperty(format!(
                "rr:predicate or rr:predicateMap in {}",
                pom_id
            )));
        }

        let mut object_maps = Vec::new();
        for obj in self.graph.objects(pom_id, RML::OBJECT) {
            object_maps.push(ObjectMap {
                kind: ObjectKind::Constant(constant_from_term(obj)),
                term_type: None,
                datatype: None,
                language: None,
                language_map: None,
            });
        }
        for om in self.graph.objects(pom_id, RML::OBJECT_MAP) {
            object_maps.push(self.extract_object_map(om)?);
        }
        if object_maps.is_empty() {
            return Err(RmlError::MissingProperty(format!(
                "rr:object or rr:objectMap in {}",
                pom_id
            )));
        }

        Ok(PredicateObjectMap {
            predicates,
            object_maps,
        })
    }

    /// Extract a predicate map node (or IRI used as a constant predicate map)
    fn extract_predicate_map(&self, term: &NodeTerm) -> RmlResult<PredicateMap> {
        let pm_id = match term {
            NodeTerm::Blank(id) => id.as_str(),
            NodeTerm::Iri(id) if self.graph.node(id).is_some() => id.as_str(),
            NodeTerm::Iri(iri) => return Ok(PredicateMap::Constant(iri.clone())),
            NodeTerm::Literal { .. } => {
                return Err(RmlError::InvalidValue {
                    property: "rr:predicateMap".to_string(),
                    message: "expected a node".to_string(),
                })
            }
        };

        if let Some(constant) = self.graph.object(pm_id, RML::CONSTANT) {
            if let Some(iri) = constant.as_str() {
                return Ok(PredicateMap::Constant(iri.to_string()));
            }
        }
        if let Some(template) = self.template(pm_id)? {
            return Ok(PredicateMap::Template(template));
        }
        if let Some(reference) = self.reference(pm_id) {
            return Ok(PredicateMap::Reference(reference));
        }

        Err(RmlError::MissingProperty(format!(
            "rr:constant, rr:template or rml:reference in predicate map {}",
            pm_id
        )))
    }

    /// Extract an object map
    fn extract_object_map(&self, term: &NodeTerm) -> RmlResult<ObjectMap> {
        let om_id = term.as_node_id().ok_or_else(|| RmlError::InvalidValue {
            property: "rr:objectMap".to_string(),
            message: "expected an object map node".to_string(),
        })?;

        // Check for rr:parentTriplesMap (RefObjectMap)
        if let Some(parent) = self.graph.object(om_id, RML::PARENT_TRIPLES_MAP) {
            let parent_iri = parent.as_node_id().ok_or_else(|| RmlError::InvalidValue {
                property: "rr:parentTriplesMap".to_string(),
                message: "expected IRI".to_string(),
            })?;
            let join_conditions = self.extract_join_conditions(om_id)?;
            return Ok(ObjectMap::parent(RefObjectMap::with_conditions(
                parent_iri,
                join_conditions,
            )));
        }

        let datatype = self
            .graph
            .object(om_id, RML::DATATYPE)
            .and_then(NodeTerm::as_iri)
            .map(str::to_string);
        let language = self
            .graph
            .object(om_id, RML::LANGUAGE)
            .and_then(NodeTerm::as_str)
            .map(str::to_string);
        let language_map = match self.graph.object(om_id, RML::LANGUAGE_MAP) {
            Some(lm) => Some(self.extract_language_map(lm)?),
            None => None,
        };
        let term_type = self.term_type(om_id)?;

        let kind = if let Some(reference) = self.reference(om_id) {
            ObjectKind::Reference(reference)
        } else if let Some(constant) = self.graph.object(om_id, RML::CONSTANT) {
            ObjectKind::Constant(constant_from_term(constant))
        } else if let Some(template) = self.template(om_id)? {
            ObjectKind::Template(template)
        } else if let Some(function) = self.function_value(om_id)? {
            ObjectKind::Function(Box::new(function))
        } else {
            return Err(RmlError::MissingProperty(format!(
                "rml:reference, rr:constant, rr:template, fnml:functionValue or \
                 rr:parentTriplesMap in object map {}",
                om_id
            )));
        };

        Ok(ObjectMap {
            kind,
            term_type,
            datatype,
            language,
            language_map,
        })
    }

    /// Extract a language map
    fn extract_language_map(&self, term: &NodeTerm) -> RmlResult<LanguageMap> {
        let lm_id = term.as_node_id().ok_or_else(|| RmlError::InvalidValue {
            property: "rml:languageMap".to_string(),
            message: "expected a language map node".to_string(),
        })?;

        if let Some(constant) = self
            .graph
            .object(lm_id, RML::CONSTANT)
            .and_then(NodeTerm::as_str)
        {
            return Ok(LanguageMap::Constant(constant.to_string()));
        }
        if let Some(reference) = self.reference(lm_id) {
            return Ok(LanguageMap::Reference(reference));
        }
        if let Some(template) = self.template(lm_id)? {
            return Ok(LanguageMap::Template(template));
        }

        Err(RmlError::MissingProperty(format!(
            "rr:constant, rml:reference or rr:template in language map {}",
            lm_id
        )))
    }

    /// Extract join conditions from a RefObjectMap
    fn extract_join_conditions(&self, om_id: &str) -> RmlResult<Vec<JoinCondition>> {
        let mut conditions = Vec::new();

        for jc in self.graph.objects(om_id, RML::JOIN_CONDITION) {
            let jc_id = jc.as_node_id().ok_or_else(|| RmlError::InvalidValue {
                property: "rr:joinCondition".to_string(),
                message: "expected a join condition node".to_string(),
            })?;

            let child = self
                .graph
                .object(jc_id, RML::CHILD)
                .and_then(NodeTerm::as_str)
                .ok_or_else(|| {
                    RmlError::MissingProperty("rr:child in join condition".to_string())
                })?;

            let parent = self
                .graph
                .object(jc_id, RML::PARENT)
                .and_then(NodeTerm::as_str)
                .ok_or_else(|| {
                    RmlError::MissingProperty("rr:parent in join condition".to_string())
                })?;

            conditions.push(JoinCondition::new(child, parent));
        }

        Ok(conditions)
    }

    /// Extract the function value referenced by `fnml:functionValue`
    fn function_value(&self, owner_id: &str) -> RmlResult<Option<FunctionValue>> {
        let Some(fv) = self.graph.object(owner_id, RML::FUNCTION_VALUE) else {
            return Ok(None);
        };
        let fv_id = fv.as_node_id().ok_or_else(|| RmlError::InvalidValue {
            property: "fnml:functionValue".to_string(),
            message: "expected a function value node".to_string(),
        })?;
        let members = self.extract_predicate_object_maps(fv_id)?;
        Ok(Some(FunctionValue::new(fv_id, members)))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    /// Find the node referenced by a required property
    fn find_node(&self, id: &str, predicate: &str) -> RmlResult<&'a str> {
        self.graph
            .object(id, predicate)
            .and_then(NodeTerm::as_node_id)
            .ok_or_else(|| RmlError::MissingProperty(format!("{} in {}", predicate, id)))
    }

    /// `rml:reference`, falling back to `rr:column`
    fn reference(&self, id: &str) -> Option<String> {
        self.graph
            .object(id, RML::REFERENCE)
            .or_else(|| self.graph.object(id, RML::COLUMN))
            .and_then(NodeTerm::as_str)
            .map(str::to_string)
    }

    /// Parsed `rr:template`
    fn template(&self, id: &str) -> RmlResult<Option<Template>> {
        self.graph
            .object(id, RML::TEMPLATE)
            .and_then(NodeTerm::as_str)
            .map(Template::parse)
            .transpose()
    }

    /// Parsed `rr:termType`; unknown term types are fatal
    fn term_type(&self, id: &str) -> RmlResult<Option<TermType>> {
        match self.graph.object(id, RML::TERM_TYPE) {
            None => Ok(None),
            Some(term) => {
                let iri = term.as_str().unwrap_or_default();
                TermType::from_iri(iri)
                    .map(Some)
                    .ok_or_else(|| RmlError::InvalidTermType(iri.to_string()))
            }
        }
    }
}

/// Create a constant value from a term
fn constant_from_term(term: &NodeTerm) -> ConstantValue {
    match term {
        NodeTerm::Iri(iri) | NodeTerm::Blank(iri) => ConstantValue::Iri(iri.clone()),
        NodeTerm::Literal {
            value,
            datatype,
            language,
        } => ConstantValue::Literal {
            value: value.clone(),
            datatype: datatype.clone(),
            language: language.clone(),
        },
    }
}

/// Guess the reference formulation from the source name
fn infer_formulation(source: &str) -> ReferenceFormulation {
    let lower = source.to_ascii_lowercase();
    if lower.ends_with(".csv") {
        ReferenceFormulation::Csv
    } else if lower.ends_with(".xml") {
        ReferenceFormulation::XPath
    } else {
        ReferenceFormulation::JsonPath
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> serde_json::Value {
        json!({
            "rr": "http://www.w3.org/ns/r2rml#",
            "rml": "http://semweb.mmlab.be/ns/rml#",
            "ql": "http://semweb.mmlab.be/ns/ql#",
            "fnml": "http://semweb.mmlab.be/ns/fnml#",
            "fno": "https://w3id.org/function/ontology#",
            "ex": "http://example.org/"
        })
    }

    fn extract(graph: serde_json::Value) -> RmlResult<Vec<TriplesMap>> {
        let doc = json!({ "@context": context(), "@graph": graph });
        let graph = NodeGraph::from_jsonld(&doc)?;
        MappingExtractor::new(&graph).extract_all()
    }

    fn source() -> serde_json::Value {
        json!({
            "rml:source": "people.json",
            "rml:referenceFormulation": { "@id": "ql:JSONPath" },
            "rml:iterator": "$.people[*]"
        })
    }

    #[test]
    fn test_extract_simple_mapping() {
        let tms = extract(json!([{
            "@id": "ex:PersonMapping",
            "@type": "rr:TriplesMap",
            "rml:logicalSource": source(),
            "rr:subjectMap": {
                "rr:template": "http://example.org/person/{id}",
                "rr:class": { "@id": "ex:Person" }
            },
            "rr:predicateObjectMap": [{
                "rr:predicate": { "@id": "ex:name" },
                "rr:objectMap": { "rml:reference": "name" }
            }]
        }]))
        .unwrap();

        assert_eq!(tms.len(), 1);
        let tm = &tms[0];
        assert_eq!(tm.iri, "http://example.org/PersonMapping");
        assert_eq!(tm.logical_source.source, "people.json");
        assert_eq!(tm.logical_source.iterator.as_deref(), Some("$.people[*]"));
        assert_eq!(
            tm.logical_source.reference_formulation,
            ReferenceFormulation::JsonPath
        );
        assert!(matches!(tm.subject_map.kind, SubjectKind::Template(_)));
        assert_eq!(tm.subject_map.classes, vec!["http://example.org/Person"]);

        let pom = &tm.predicate_object_maps[0];
        assert_eq!(
            pom.predicates[0].as_constant(),
            Some("http://example.org/name")
        );
        assert!(matches!(&pom.object_maps[0].kind, ObjectKind::Reference(r) if r == "name"));
    }

    #[test]
    fn test_extract_ref_object_map_and_conditions() {
        let tms = extract(json!([{
            "@id": "ex:RouteMapping",
            "rml:logicalSource": { "rml:source": "routes.csv" },
            "rr:subjectMap": { "rr:template": "http://example.org/route/{id}" },
            "rr:predicateObjectMap": [{
                "rr:predicate": { "@id": "ex:airline" },
                "rr:objectMap": {
                    "rr:parentTriplesMap": { "@id": "ex:AirlineMapping" },
                    "rr:joinCondition": [
                        { "rr:child": "dest_airport", "rr:parent": "dest" },
                        { "rr:child": "airline_code", "rr:parent": "airline" }
                    ]
                }
            }]
        }]))
        .unwrap();

        let tm = &tms[0];
        assert_eq!(
            tm.logical_source.reference_formulation,
            ReferenceFormulation::Csv
        );
        let rom = tm.predicate_object_maps[0].object_maps[0].as_ref().unwrap();
        assert_eq!(rom.parent_triples_map, "http://example.org/AirlineMapping");
        // declaration order is kept
        let children: Vec<&str> = rom
            .join_conditions
            .iter()
            .map(|jc| jc.child.as_str())
            .collect();
        assert_eq!(children, vec!["dest_airport", "airline_code"]);
    }

    #[test]
    fn test_extract_blank_subject_and_shortcuts() {
        let tms = extract(json!([{
            "@id": "ex:Blank",
            "rml:logicalSource": source(),
            "rr:subjectMap": { "rr:termType": { "@id": "rr:BlankNode" } },
            "rr:predicateObjectMap": [{
                "rr:predicate": [{ "@id": "ex:a" }, { "@id": "ex:b" }],
                "rr:object": "fixed"
            }]
        }]))
        .unwrap();

        let tm = &tms[0];
        assert!(matches!(tm.subject_map.kind, SubjectKind::Blank));
        assert_eq!(tm.subject_map.term_type, Some(TermType::BlankNode));
        let pom = &tm.predicate_object_maps[0];
        assert_eq!(pom.predicates.len(), 2);
        assert!(matches!(
            &pom.object_maps[0].kind,
            ObjectKind::Constant(ConstantValue::Literal { value, .. }) if value == "fixed"
        ));
    }

    #[test]
    fn test_extract_function_value() {
        let tms = extract(json!([{
            "@id": "ex:Upper",
            "rml:logicalSource": source(),
            "rr:subjectMap": { "rml:reference": "id" },
            "rr:predicateObjectMap": [{
                "rr:predicate": { "@id": "ex:name" },
                "rr:objectMap": {
                    "fnml:functionValue": {
                        "rr:predicateObjectMap": [
                            {
                                "rr:predicate": { "@id": "fno:executes" },
                                "rr:objectMap": { "rr:constant": { "@id": "ex:toUpper" } }
                            },
                            {
                                "rr:predicate": { "@id": "ex:valueParam" },
                                "rr:objectMap": { "rml:reference": "name" }
                            }
                        ]
                    }
                }
            }]
        }]))
        .unwrap();

        let om = &tms[0].predicate_object_maps[0].object_maps[0];
        let ObjectKind::Function(fv) = &om.kind else {
            panic!("expected function value, got {:?}", om.kind);
        };
        assert_eq!(fv.members.len(), 2);
        assert!(fv.members[0].has_constant_predicate(RML::EXECUTES));
        assert!(om.resolved_term_type().is_none());
    }

    #[test]
    fn test_subject_map_shape_errors() {
        let missing = extract(json!([{ "@id": "ex:M", "rml:logicalSource": source() }]));
        assert!(matches!(missing, Err(RmlError::MissingProperty(_))));

        let two = extract(json!([{
            "@id": "ex:M",
            "rml:logicalSource": source(),
            "rr:subject": { "@id": "ex:s" },
            "rr:subjectMap": { "rml:reference": "id" }
        }]));
        assert!(matches!(two, Err(RmlError::InvalidValue { .. })));

        let combo = extract(json!([{
            "@id": "ex:M",
            "rml:logicalSource": source(),
            "rr:subjectMap": { "rml:reference": "id", "rr:template": "ex:{id}" }
        }]));
        assert!(matches!(combo, Err(RmlError::InvalidValue { .. })));

        let literal = extract(json!([{
            "@id": "ex:M",
            "rml:logicalSource": source(),
            "rr:subjectMap": { "rml:reference": "id", "rr:termType": { "@id": "rr:Literal" } }
        }]));
        assert!(matches!(literal, Err(RmlError::InvalidTermType(_))));
    }

    #[test]
    fn test_predicate_object_map_shape_errors() {
        let no_predicate = extract(json!([{
            "@id": "ex:M",
            "rml:logicalSource": source(),
            "rr:subjectMap": { "rml:reference": "id" },
            "rr:predicateObjectMap": [{ "rr:objectMap": { "rml:reference": "x" } }]
        }]));
        assert!(matches!(no_predicate, Err(RmlError::MissingProperty(_))));

        let no_object = extract(json!([{
            "@id": "ex:M",
            "rml:logicalSource": source(),
            "rr:subjectMap": { "rml:reference": "id" },
            "rr:predicateObjectMap": [{ "rr:predicate": { "@id": "ex:p" } }]
        }]));
        assert!(matches!(no_object, Err(RmlError::MissingProperty(_))));

        let bad_term_type = extract(json!([{
            "@id": "ex:M",
            "rml:logicalSource": source(),
            "rr:subjectMap": { "rml:reference": "id" },
            "rr:predicateObjectMap": [{
                "rr:predicate": { "@id": "ex:p" },
                "rr:objectMap": { "rml:reference": "x", "rr:termType": { "@id": "ex:Nope" } }
            }]
        }]));
        assert!(matches!(bad_term_type, Err(RmlError::InvalidTermType(_))));
    }

    #[test]
    fn test_extract_language_map() {
        let tms = extract(json!([{
            "@id": "ex:M",
            "rml:logicalSource": source(),
            "rr:subjectMap": { "rml:reference": "id" },
            "rr:predicateObjectMap": [{
                "rr:predicate": { "@id": "ex:label" },
                "rr:objectMap": {
                    "rml:reference": "label",
                    "rr:language": "en",
                    "rml:languageMap": { "rml:reference": "lang" }
                }
            }]
        }]))
        .unwrap();

        let om = &tms[0].predicate_object_maps[0].object_maps[0];
        assert_eq!(om.language.as_deref(), Some("en"));
        assert!(matches!(&om.language_map, Some(LanguageMap::Reference(r)) if r == "lang"));
    }
}
