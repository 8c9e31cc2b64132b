use pretty_assertions::assert_eq;

use crate::ast::{
    BinaryOp, DescribeTargets, Expression, GraphPattern, OrderDirection, PathPrimary, Projection,
    ProjectionItem, PropertyPath, Query, QueryForm, SelectModifier, TermKind, Variables, Verb,
    RDF_FIRST, RDF_NIL, RDF_REST, RDF_TYPE,
};
use crate::config::{ParserConfig, ProjectionNaming};
use crate::error::ParseError;
use crate::expand::PrefixMap;
use crate::parse::{parse, parse_with};

fn assert_parses(input: &str) -> Query {
    match parse(input) {
        Ok(query) => query,
        Err(err) => panic!("parse failed: {}", err.render(input)),
    }
}

fn assert_fails(input: &str) -> ParseError {
    match parse(input) {
        Ok(query) => panic!("expected failure, parsed as:\n{query}"),
        Err(err) => err,
    }
}

fn select_items(query: &Query) -> &[ProjectionItem] {
    match &query.form {
        QueryForm::Select(select) => match &select.projection {
            Projection::Items(items) => items,
            Projection::All => panic!("expected explicit projection"),
        },
        other => panic!("expected SELECT, got {}", other.keyword()),
    }
}

/// Top-level patterns of the WHERE block.
fn where_patterns(query: &Query) -> &[GraphPattern] {
    &query.where_clause().expect("WHERE clause").patterns
}

fn var_names(query: &Query) -> Vec<String> {
    query.free_variables().iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_simple_select() {
    let query = assert_parses("SELECT * WHERE { }");
    assert!(matches!(
        query.form(),
        QueryForm::Select(select) if select.projection == Projection::All
    ));
    assert_eq!(query.limit(), -1);
    assert_eq!(query.offset(), -1);
    assert!(query.values().is_empty());
}

#[test]
fn test_select_distinct_and_reduced() {
    for (text, expected) in [
        ("SELECT DISTINCT ?x WHERE { ?x ?p ?o }", SelectModifier::Distinct),
        ("SELECT REDUCED ?x WHERE { ?x ?p ?o }", SelectModifier::Reduced),
    ] {
        match assert_parses(text).form {
            QueryForm::Select(select) => assert_eq!(select.modifier, Some(expected)),
            other => panic!("expected SELECT, got {}", other.keyword()),
        }
    }
}

#[test]
fn test_where_keyword_is_optional() {
    let with = assert_parses("SELECT ?s { ?s ?p ?o }");
    let without = assert_parses("SELECT ?s WHERE { ?s ?p ?o }");
    assert_eq!(with.to_string(), without.to_string());
}

#[test]
fn test_prologue() {
    let query = assert_parses(
        "BASE <http://example.org/>
         PREFIX foaf: <http://xmlns.com/foaf/0.1/>
         PREFIX : <http://example.org/ns#>
         SELECT ?name WHERE { ?s foaf:name ?name }",
    );
    let prefixes = query.prefixes();
    assert_eq!(prefixes.base(), Some("http://example.org/"));
    assert_eq!(prefixes.get("foaf"), Some("http://xmlns.com/foaf/0.1/"));
    assert_eq!(prefixes.get(PrefixMap::DEFAULT_KEY), Some("http://example.org/ns#"));
    assert_eq!(prefixes.len(), 3);
}

#[test]
fn test_prefix_requires_iriref() {
    let err = assert_fails("PREFIX ex: ex:other SELECT * WHERE { }");
    assert!(err.to_string().contains("expected IRI after prefix name"), "{err}");
}

#[test]
fn test_missing_query_form() {
    let err = assert_fails("PREFIX ex: <http://example.org/> WHERE { }");
    assert!(err.is_syntax());
    assert!(
        err.to_string().contains("expected SELECT, CONSTRUCT, ASK or DESCRIBE"),
        "{err}"
    );
}

#[test]
fn test_rendering_is_a_fixpoint() {
    let inputs = [
        "PREFIX ex: <http://example.org/> SELECT ?s ?o WHERE { ?s ex:p ?o ; ex:q 1 , 2 . FILTER(?o > 3) }",
        "SELECT (COUNT(DISTINCT ?s) AS ?n) WHERE { ?s a ?t } GROUP BY ?t HAVING (COUNT(?s) > 1) ORDER BY DESC(?n) LIMIT 5 OFFSET 2",
        "SELECT * WHERE { { ?s ?p ?o } UNION { ?o ?p ?s } OPTIONAL { ?s <http://x/label> ?l } MINUS { ?s ?q 3 } }",
        "ASK WHERE { GRAPH ?g { ?s ?p \"chat\"@fr } BIND (STRLEN(?s) AS ?len) }",
        "DESCRIBE ?x <http://example.org/thing> WHERE { ?x ?p ?o }",
        "CONSTRUCT { ?s <http://x/knows> ?o . } WHERE { ?s <http://x/friend>+ ?o }",
        "SELECT ?x WHERE { VALUES (?x ?y) { (1 UNDEF) (\"a\"^^<http://x/dt> 2) } }",
        "SELECT ?x WHERE { ?x ?p ?o FILTER NOT EXISTS { ?x a <http://x/T> } } VALUES ?x { 1 2 }",
        r"PREFIX ex: <http://ex.org/> SELECT * WHERE { ?s ex:p ex:a\,b , ex:a\(b , ex:v1.2 , ex:\-x\. }",
    ];
    for input in inputs {
        let first = assert_parses(input).to_string();
        let second = assert_parses(&first).to_string();
        assert_eq!(first, second, "rendering of {input:?} is not stable");
    }
}

#[test]
fn test_escaped_local_names_survive_rendering() {
    let query = assert_parses(
        r"PREFIX ex: <http://ex.org/> SELECT * WHERE { ?s ex:p ex:a\,b ; ex:q ex:c\;d }",
    );
    let rendered = query.to_string();
    assert!(rendered.contains(r"ex:a\,b"), "{rendered}");
    assert!(rendered.contains(r"ex:c\;d"), "{rendered}");

    let reparsed = assert_parses(&rendered);
    let objects: Vec<_> = reparsed
        .where_clause()
        .unwrap()
        .triples()
        .map(|t| t.object.value.to_string())
        .collect();
    assert_eq!(objects, vec!["ex:a,b", "ex:c;d"]);
}

#[test]
fn test_round_trip_keeps_free_variables() {
    let input = "SELECT ?s (STR(?o) AS ?label) WHERE { ?s ?p ?o . OPTIONAL { ?o ?q ?z } BIND (1 AS ?one) }";
    let query = assert_parses(input);
    let reparsed = assert_parses(&query.to_string());
    assert_eq!(query.free_variables(), reparsed.free_variables());
    assert_eq!(
        var_names(&query),
        vec!["?label", "?o", "?one", "?p", "?q", "?s", "?z"]
    );
}

#[test]
fn test_literal_round_trip() {
    let query = assert_parses(
        r#"SELECT * WHERE { ?s ?p "tab\there", "quote\"d", "x"@en-GB, "5"^^<http://www.w3.org/2001/XMLSchema#int>, -1.5e3, true }"#,
    );
    let reparsed = assert_parses(&query.to_string());
    let objects: Vec<_> = query.where_clause().unwrap().triples().map(|t| &t.object).collect();
    let again: Vec<_> = reparsed.where_clause().unwrap().triples().map(|t| &t.object).collect();
    assert_eq!(objects, again);
    assert_eq!(objects[0].value.as_ref(), "tab\there");
    assert_eq!(objects[2].lang.as_deref(), Some("en-GB"));
    assert_eq!(objects[4].kind, TermKind::Numeric);
    assert_eq!(objects[5].kind, TermKind::Boolean);
}

#[test]
fn test_rdf_type_alias_expands() {
    let query = parse_with(
        "SELECT * WHERE { ?s a ?o }",
        &ParserConfig::default().with_expand_prefixes(true),
    )
    .unwrap();
    let triple = query.where_clause().unwrap().triples().next().unwrap();
    match &triple.predicate {
        Verb::Term(term) => assert_eq!(term.value.as_ref(), RDF_TYPE),
        other => panic!("expected term predicate, got {other}"),
    }
}

#[test]
fn test_expansion_is_idempotent() {
    let mut query = assert_parses(
        "PREFIX ex: <http://example.org/> SELECT ?s WHERE { ?s ex:p \"1\"^^ex:dt ; a ex:Thing }",
    );
    query.expand_own_prefixes();
    let once = query.clone();
    query.expand_own_prefixes();
    assert_eq!(once, query);
    assert!(once.to_string().contains("<http://example.org/p>"));
    assert!(once.to_string().contains("^^<http://example.org/dt>"));
}

#[test]
fn test_parse_with_expands_prefixes() {
    let config = ParserConfig::default().with_expand_prefixes(true);
    let query = parse_with(
        "PREFIX : <http://example.org/> SELECT ?s WHERE { ?s :name ?n }",
        &config,
    )
    .unwrap();
    let triple = query.where_clause().unwrap().triples().next().unwrap();
    match &triple.predicate {
        Verb::Term(term) => {
            assert!(term.expanded);
            assert_eq!(term.value.as_ref(), "http://example.org/name");
        }
        other => panic!("expected term predicate, got {other}"),
    }
}

#[test]
fn test_triples_coalesce_into_one_bgp() {
    let query = assert_parses("SELECT * WHERE { ?s ?p ?o . ?s ?q ?r . FILTER(?o = 1) }");
    let patterns = where_patterns(&query);
    assert_eq!(patterns.len(), 1);
    match &patterns[0] {
        GraphPattern::Basic(bgp) => {
            assert_eq!(bgp.triples.len(), 2);
            assert_eq!(bgp.filters.len(), 1);
        }
        other => panic!("expected BGP, got {other}"),
    }
}

#[test]
fn test_optional_splits_bgps() {
    let query = assert_parses("SELECT * WHERE { ?s ?p ?o OPTIONAL { ?s ?q ?r } ?s ?x ?y }");
    let patterns = where_patterns(&query);
    assert_eq!(patterns.len(), 3);
    assert!(matches!(patterns[0], GraphPattern::Basic(_)));
    assert!(matches!(patterns[1], GraphPattern::Optional(_)));
    assert!(matches!(patterns[2], GraphPattern::Basic(_)));
}

#[test]
fn test_union_alternatives_flatten() {
    let query = assert_parses("SELECT * WHERE { { ?s ?p 1 } UNION { ?s ?p 2 } UNION { ?s ?p 3 } }");
    match where_patterns(&query) {
        [GraphPattern::Union(alternatives)] => assert_eq!(alternatives.len(), 3),
        other => panic!("expected one union, got {other:?}"),
    }
}

#[test]
fn test_nested_group_without_union() {
    let query = assert_parses("SELECT * WHERE { { ?s ?p ?o } }");
    assert!(matches!(where_patterns(&query), [GraphPattern::Group(_)]));
}

#[test]
fn test_graph_and_service() {
    let query = assert_parses(
        "SELECT * WHERE { GRAPH <http://g> { ?s ?p ?o } SERVICE SILENT <http://remote/sparql> { ?s ?q ?r } }",
    );
    match where_patterns(&query) {
        [GraphPattern::Graph { name, .. }, GraphPattern::Service { silent, .. }] => {
            assert!(name.is_iri());
            assert!(*silent);
        }
        other => panic!("unexpected patterns {other:?}"),
    }
}

#[test]
fn test_missing_object_reports_position() {
    let err = assert_fails("SELECT ?x WHERE { ?x ?y }");
    assert!(err.is_syntax());
    assert_eq!(err.line(), 1);
    assert_eq!(err.column(), 25);
    assert_eq!(
        err.to_string(),
        "syntax error at line 1, column 25: unexpected }, expected RDF term"
    );
}

#[test]
fn test_missing_dot_between_triples() {
    let err = assert_fails("SELECT * WHERE { ?s ?p ?o ?a ?b ?c }");
    assert!(err.to_string().contains("'.' between triple patterns"), "{err}");
}

#[test]
fn test_error_line_numbers() {
    let err = assert_fails("SELECT ?x\nWHERE {\n  ?x ?y ?z .\n  FILTER( }\n");
    assert_eq!(err.line(), 4);
}

#[test]
fn test_property_and_object_lists() {
    let query = assert_parses("SELECT * WHERE { ?s <http://x/p> 1, 2 ; <http://x/q> 3 ; }");
    let triples: Vec<_> = query.where_clause().unwrap().triples().collect();
    assert_eq!(triples.len(), 3);
    assert!(triples.iter().all(|t| t.subject.value.as_ref() == "?s"));
    assert_eq!(triples[2].object.value.as_ref(), "3");
}

#[test]
fn test_blank_node_property_list() {
    let query = assert_parses("SELECT * WHERE { ?s <http://x/knows> [ <http://x/name> ?n ] }");
    let triples: Vec<_> = query.where_clause().unwrap().triples().collect();
    assert_eq!(triples.len(), 2);
    // The nested triple is emitted first and shares the fresh node.
    assert!(triples[0].subject.is_bnode());
    assert_eq!(triples[0].subject, triples[1].object);
    assert_eq!(triples[0].subject.value.as_ref(), "anon0");
}

#[test]
fn test_standalone_blank_node_subject() {
    let query = assert_parses("SELECT * WHERE { [ <http://x/p> 1 ] . }");
    assert_eq!(query.where_clause().unwrap().triples().count(), 1);
}

#[test]
fn test_collection_object() {
    let query = assert_parses("SELECT * WHERE { ?s <http://x/list> (1 ?x) }");
    let triples: Vec<_> = query.where_clause().unwrap().triples().collect();
    // Two cells of first/rest plus the triple using the head.
    assert_eq!(triples.len(), 5);
    let predicate = |i: usize| match &triples[i].predicate {
        Verb::Term(term) => term.value.to_string(),
        Verb::Path(path) => path.to_string(),
    };
    assert_eq!(predicate(0), RDF_FIRST);
    assert_eq!(predicate(1), RDF_REST);
    assert_eq!(triples[3].object.value.as_ref(), RDF_NIL);
    assert_eq!(triples[4].object, triples[0].subject);
}

#[test]
fn test_empty_collection_is_nil() {
    let query = assert_parses("SELECT * WHERE { ?s <http://x/list> () }");
    let triple = query.where_clause().unwrap().triples().next().unwrap();
    assert!(triple.object.is_nil());
}

#[test]
fn test_property_path_predicates() {
    let query = assert_parses("SELECT * WHERE { ?s <http://x/a>/^<http://x/b>* ?o . ?o !a ?z }");
    let triples: Vec<_> = query.where_clause().unwrap().triples().collect();
    match &triples[0].predicate {
        Verb::Path(PropertyPath::Sequence { .. }) => {}
        other => panic!("expected sequence path, got {other}"),
    }
    match &triples[1].predicate {
        Verb::Path(PropertyPath::Elt(term)) => {
            assert!(matches!(&term.primary, PathPrimary::Negated(set) if set.len() == 1));
        }
        other => panic!("expected negated path, got {other}"),
    }
}

#[test]
fn test_filter_precedence() {
    let query = assert_parses("SELECT * WHERE { ?s ?p ?o FILTER(1 + 2 * 3 = 7 && !BOUND(?x)) }");
    let filter = match &where_patterns(&query)[0] {
        GraphPattern::Basic(bgp) => &bgp.filters[0],
        other => panic!("expected BGP, got {other}"),
    };
    assert!(matches!(
        filter.expression,
        Expression::Binary {
            op: BinaryOp::And,
            ..
        }
    ));
    assert_eq!(
        filter.to_string(),
        "FILTER (((1 + (2 * 3)) = 7) && !BOUND(?x))"
    );
}

#[test]
fn test_bind_and_values_patterns() {
    let query = assert_parses(
        "SELECT * WHERE { ?s ?p ?o BIND(?o * 2 AS ?d) VALUES (?a ?b) { (1 2) (UNDEF 3) } }",
    );
    match where_patterns(&query) {
        [GraphPattern::Basic(_), GraphPattern::Bind(bind), GraphPattern::Values(values)] => {
            assert_eq!(bind.variable.value.as_ref(), "?d");
            assert_eq!(values.variables.len(), 2);
            assert_eq!(values.rows[1][0], None);
        }
        other => panic!("unexpected patterns {other:?}"),
    }
}

#[test]
fn test_values_row_arity_is_checked() {
    let err = assert_fails("SELECT * WHERE { VALUES (?a ?b) { (1 2 3) } }");
    assert!(err.to_string().contains("')' closing VALUES row"), "{err}");

    let err = assert_fails("SELECT * WHERE { VALUES (?a ?b) { (1) } }");
    assert!(err.to_string().contains("data value or UNDEF"), "{err}");
}

#[test]
fn test_values_nil_form() {
    let query = assert_parses("SELECT * WHERE { } VALUES () { () () }");
    assert!(query.values().variables.is_empty());
    assert_eq!(query.values().rows.len(), 2);
}

#[test]
fn test_trailing_values_single_variable() {
    let query = assert_parses("SELECT ?x WHERE { ?x ?p ?o } VALUES ?x { <http://a> \"b\" }");
    assert_eq!(query.values().variables.len(), 1);
    assert_eq!(query.values().rows.len(), 2);
}

#[test]
fn test_modifier_order_independence() {
    let a = assert_parses("SELECT ?x WHERE { ?x ?p ?o } ORDER BY ?x LIMIT 10 OFFSET 5");
    let b = assert_parses("SELECT ?x WHERE { ?x ?p ?o } OFFSET 5 LIMIT 10 ORDER BY ?x");
    assert_eq!(a.limit(), 10);
    assert_eq!(a.offset(), 5);
    assert_eq!(a.to_string(), b.to_string());
    assert!(a.to_string().ends_with("\nORDER BY ?x\nLIMIT 10\nOFFSET 5"));
}

#[test]
fn test_limit_zero_is_not_absent() {
    let query = assert_parses("SELECT * WHERE { } LIMIT 0");
    assert_eq!(query.limit(), 0);
    assert_eq!(query.offset(), -1);
}

#[test]
fn test_duplicate_modifier_rejected() {
    let err = assert_fails("SELECT * WHERE { } LIMIT 1 LIMIT 2");
    assert!(err.to_string().contains("at most one LIMIT clause"), "{err}");

    let err = assert_fails("SELECT * WHERE { } ORDER BY ?x ORDER BY ?y");
    assert!(err.to_string().contains("at most one ORDER BY clause"), "{err}");
}

#[test]
fn test_negative_limit_rejected() {
    let err = assert_fails("SELECT * WHERE { } LIMIT -1");
    assert!(err.to_string().contains("non-negative integer"), "{err}");
}

#[test]
fn test_group_by_having_order_by() {
    let query = assert_parses(
        "SELECT ?t (SUM(?v) AS ?total) WHERE { ?s a ?t ; <http://x/v> ?v }
         GROUP BY ?t (STRLEN(?t) AS ?len) HAVING (SUM(?v) > 10)
         ORDER BY ASC(?t) DESC(?total) ?len",
    );
    assert_eq!(query.group_by().len(), 2);
    assert!(query.group_by()[1].alias.is_some());
    assert_eq!(query.having().len(), 1);

    let order = query.order_by();
    assert_eq!(order.len(), 3);
    assert_eq!(order[0].direction, Some(OrderDirection::Asc));
    assert!(order[1].is_descending());
    assert_eq!(order[2].direction, None);
}

#[test]
fn test_projection_with_alias() {
    let query = assert_parses("SELECT ?x (42 AS ?answer) WHERE { ?x ?p ?o }");
    let items = select_items(&query);
    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], ProjectionItem::Var(v) if v.value.as_ref() == "?x"));
    match &items[1] {
        ProjectionItem::Expr { alias, .. } => assert_eq!(alias.value.as_ref(), "?answer"),
        other => panic!("expected aliased expression, got {other}"),
    }
}

#[test]
fn test_parenthesised_projection_needs_alias() {
    let err = assert_fails("SELECT (42) WHERE { }");
    assert!(err.to_string().contains("expected AS"), "{err}");
}

#[test]
fn test_unparenthesised_alias() {
    let query = assert_parses("SELECT COUNT(?x) AS ?n WHERE { ?x ?p ?o }");
    assert_eq!(select_items(&query)[0].variable().value.as_ref(), "?n");
}

#[test]
fn test_anonymous_projection_positional_names() {
    let query = assert_parses("SELECT ?g COUNT(?x) MAX(?y) WHERE { ?x ?p ?y } GROUP BY ?g");
    let names: Vec<_> = select_items(&query)
        .iter()
        .map(|item| item.variable().value.to_string())
        .collect();
    assert_eq!(names, vec!["?g", "?count_1", "?max_2"]);

    // Stable across parses.
    let again = assert_parses("SELECT ?g COUNT(?x) MAX(?y) WHERE { ?x ?p ?y } GROUP BY ?g");
    assert_eq!(query.to_string(), again.to_string());
}

#[test]
fn test_anonymous_projection_skips_taken_names() {
    let query =
        assert_parses("SELECT ?count_1 COUNT(?x) $count_2 MAX(?y) WHERE { ?x ?p ?y }");
    let names: Vec<_> = select_items(&query)
        .iter()
        .map(|item| item.variable().value.to_string())
        .collect();
    assert_eq!(names, vec!["?count_1", "?count_3", "$count_2", "?max_3"]);

    let reparsed = assert_parses(&query.to_string());
    assert_eq!(query.free_variables(), reparsed.free_variables());
}

#[test]
fn test_anonymous_projection_random_names() {
    let config = ParserConfig::default().with_projection_naming(ProjectionNaming::Random);
    let query = parse_with("SELECT STRLEN(?x) WHERE { ?x ?p ?o }", &config).unwrap();
    let name = select_items(&query)[0].variable().value.to_string();
    let suffix: u32 = name.trim_start_matches("?strlen_").parse().unwrap();
    assert!(suffix <= 100);
}

#[test]
fn test_empty_projection_rejected() {
    let err = assert_fails("SELECT WHERE { }");
    assert!(err.to_string().contains("'*' or projection"), "{err}");
}

#[test]
fn test_sub_select() {
    let query = assert_parses(
        "SELECT ?s ?n WHERE { ?s ?p ?o { SELECT ?s (COUNT(?x) AS ?n) WHERE { ?s ?q ?x } GROUP BY ?s LIMIT 3 } }",
    );
    let group = match &where_patterns(&query)[1] {
        GraphPattern::Group(group) => group,
        other => panic!("expected nested group, got {other}"),
    };
    let sub = group.as_sub_select().expect("sub-select");
    assert_eq!(sub.modifiers.limit, 3);
    assert_eq!(sub.modifiers.group_by.len(), 1);
}

#[test]
fn test_broken_sub_select_reports_its_own_error() {
    let err = assert_fails("SELECT * WHERE { { SELECT ?s WHERE { ?s ?p } } }");
    assert!(err.to_string().contains("expected RDF term"), "{err}");
}

#[test]
fn test_dataset_clauses() {
    let query = assert_parses(
        "SELECT * FROM <http://g/default> FROM NAMED <http://g/one> WHERE { GRAPH ?g { ?s ?p ?o } }",
    );
    let dataset = query.dataset();
    assert_eq!(dataset.len(), 2);
    assert!(!dataset[0].named);
    assert!(dataset[1].named);
    assert!(query
        .to_string()
        .contains("\nFROM <http://g/default>\nFROM NAMED <http://g/one>\n"));
}

#[test]
fn test_ask() {
    let query = assert_parses("ASK { ?s ?p ?o }");
    assert!(matches!(query.form(), QueryForm::Ask));
    assert!(query.where_clause().is_some());
}

#[test]
fn test_construct_template() {
    let query = assert_parses(
        "CONSTRUCT { ?s <http://x/name> ?n . ?s a <http://x/Person> } WHERE { ?s <http://x/label> ?n }",
    );
    match query.form() {
        QueryForm::Construct {
            template: Some(template),
        } => assert_eq!(template.len(), 2),
        other => panic!("expected CONSTRUCT with template, got {other:?}"),
    }
}

#[test]
fn test_construct_short_form() {
    let query = assert_parses("CONSTRUCT WHERE { ?s <http://x/p> ?o }");
    assert!(matches!(
        query.form(),
        QueryForm::Construct { template: None }
    ));
    assert_eq!(query.where_clause().unwrap().triples().count(), 1);
}

#[test]
fn test_construct_rejects_paths() {
    let err = assert_fails("CONSTRUCT { ?s <http://x/a>/<http://x/b> ?o } WHERE { ?s ?p ?o }");
    assert!(err.to_string().contains("CONSTRUCT template"), "{err}");

    let err = assert_fails("CONSTRUCT WHERE { ?s ?p ?o FILTER(?o > 1) }");
    assert!(err.to_string().contains("triple patterns only"), "{err}");
}

#[test]
fn test_describe_forms() {
    let star = assert_parses("DESCRIBE *  WHERE { ?s ?p ?o }");
    assert!(matches!(
        star.form(),
        QueryForm::Describe {
            targets: DescribeTargets::All
        }
    ));

    let bare = assert_parses("DESCRIBE <http://example.org/a> ?x");
    match bare.form() {
        QueryForm::Describe {
            targets: DescribeTargets::Terms(terms),
        } => assert_eq!(terms.len(), 2),
        other => panic!("expected DESCRIBE targets, got {other:?}"),
    }
    assert!(bare.where_clause().is_none());
}

#[test]
fn test_trailing_garbage_rejected() {
    let err = assert_fails("SELECT * WHERE { } }");
    assert!(err.to_string().contains("expected end of input"), "{err}");
}

#[test]
fn test_lex_error_surfaces() {
    let err = assert_fails("SELECT * WHERE { ?s ?p ~ }");
    assert!(err.is_lex());
    assert_eq!(err.to_string(), "lexical error at line 1, column 24: unexpected \"~\"");
}

#[test]
fn test_unknown_word_is_syntax_error() {
    let err = assert_fails("SELECT ?x WHERE { ?x ?p ?o } frobnicate");
    assert!(err.is_syntax());
    assert_eq!((err.line(), err.column()), (1, 30));
    assert!(err.to_string().contains("unexpected frobnicate"), "{err}");

    let err = assert_fails("SELECT * WHERE { ?s ?p ?o } ORDR BY ?s");
    assert!(err.to_string().contains("unexpected ORDR"), "{err}");
}

#[test]
fn test_parse_is_reentrant() {
    let text = "SELECT * WHERE { ?s <http://x/p> [ <http://x/q> ?o ] }";
    let a = assert_parses(text);
    let b = assert_parses(text);
    assert_eq!(a, b);
}

#[test]
fn test_typed_literal_expands_datatype() {
    let config = ParserConfig::default().with_expand_prefixes(true);
    let query = parse_with(
        "PREFIX xsd: <http://www.w3.org/2001/XMLSchema#> SELECT * WHERE { ?s ?p \"5\"^^xsd:integer }",
        &config,
    )
    .unwrap();
    let triple = query.where_clause().unwrap().triples().next().unwrap();
    assert_eq!(
        triple.object.to_string(),
        "\"5\"^^<http://www.w3.org/2001/XMLSchema#integer>"
    );
}

#[test]
fn test_grouping_modifiers_in_any_order() {
    let a = assert_parses("SELECT ?x WHERE { ?x ?p ?o } GROUP BY ?x HAVING (?x > 1) ORDER BY ?x LIMIT 5");
    let b = assert_parses("SELECT ?x WHERE { ?x ?p ?o } ORDER BY ?x LIMIT 5 HAVING (?x > 1) GROUP BY ?x");
    assert_eq!(a.modifiers.to_string(), b.modifiers.to_string());
    assert_eq!(a.group_by().len(), 1);
    assert_eq!(a.having().len(), 1);
    assert_eq!(b.limit(), 5);
}
