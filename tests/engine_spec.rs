use feature_linkage::engine::*;
use feature_linkage::models::*;
use speculate2::speculate;

fn link(id: &str, title: &str, confidence: f64, started_at: &str) -> SessionLink {
    SessionLink {
        session_id: id.to_string(),
        title: Some(title.to_string()),
        confidence,
        started_at: started_at.to_string(),
        ..Default::default()
    }
}

fn doc(id: &str, title: &str, doc_type: &str, file_path: &str) -> LinkedDocument {
    LinkedDocument {
        id: id.to_string(),
        title: title.to_string(),
        doc_type: doc_type.to_string(),
        file_path: file_path.to_string(),
        category: None,
    }
}

fn artifact(id: &str, kind: &str, title: &str, source: &str) -> Artifact {
    Artifact {
        id: id.to_string(),
        kind: kind.to_string(),
        title: title.to_string(),
        source: source.to_string(),
        ..Default::default()
    }
}

fn task_call(id: &str, args: &str, thread: Option<&str>) -> SessionLog {
    SessionLog {
        id: id.to_string(),
        kind: "tool".to_string(),
        timestamp: "2026-05-01T10:00:00Z".to_string(),
        linked_session_id: thread.map(str::to_string),
        tool_call: Some(ToolCall {
            name: "Task".to_string(),
            status: "success".to_string(),
            args: args.to_string(),
        }),
        metadata: None,
    }
}

fn thread(id: &str, agent_name: Option<&str>) -> Session {
    Session {
        id: id.to_string(),
        agent_name: agent_name.map(str::to_string),
        ..Default::default()
    }
}

fn ids(sessions: &[SessionLink]) -> Vec<&str> {
    sessions.iter().map(|s| s.session_id.as_str()).collect()
}

fn titles(docs: &[LinkedDocument]) -> Vec<&str> {
    docs.iter().map(|d| d.title.as_str()).collect()
}

speculate! {
    describe "classify_sessions" {
        describe "tiering" {
            it "puts every session in exactly one tier" {
                let sessions = vec![
                    link("a", "Chat", 0.2, ""),
                    link("b", "Chat", 0.9, ""),
                    link("c", "Chat", 0.89, ""),
                    SessionLink { is_primary_link: Some(true), ..link("d", "Chat", 0.1, "") },
                ];

                let result = classify_sessions(&sessions);

                assert_eq!(result.primary.len() + result.secondary.len(), sessions.len());
                let mut primary = ids(&result.primary);
                primary.sort();
                assert_eq!(primary, vec!["b", "d"]);
                let mut secondary = ids(&result.secondary);
                secondary.sort();
                assert_eq!(secondary, vec!["a", "c"]);
            }

            it "orders secondary sessions by confidence then recency" {
                let sessions = vec![
                    link("old", "x", 0.5, "2026-01-01T00:00:00Z"),
                    link("new", "x", 0.5, "2026-02-01T00:00:00Z"),
                    link("best", "x", 0.7, "2025-01-01T00:00:00Z"),
                ];

                let result = classify_sessions(&sessions);
                assert_eq!(ids(&result.secondary), vec!["best", "new", "old"]);
            }

            it "returns empty results for empty input" {
                let result = classify_sessions(&[]);
                assert!(result.primary.is_empty());
                assert!(result.secondary.is_empty());
                assert!(result.groups.plan.is_empty());
                assert!(result.groups.execution.is_empty());
                assert!(result.groups.other.is_empty());
            }
        }

        describe "grouping" {
            it "groups every primary session exactly once" {
                let sessions = vec![
                    link("plan", "Research caching options", 0.95, ""),
                    link("exec", "Implement cache layer", 0.95, ""),
                    link("other", "Fix typo", 0.95, ""),
                ];

                let result = classify_sessions(&sessions);
                let groups = &result.groups;
                assert_eq!(groups.plan.len() + groups.execution.len() + groups.other.len(), 3);
                assert_eq!(ids(&groups.plan), vec!["plan"]);
                assert_eq!(ids(&groups.execution), vec!["exec"]);
                assert_eq!(ids(&groups.other), vec!["other"]);
            }

            it "classifies a Phase 3 title as execution with phase 3" {
                let session = link("s", "Phase 3", 0.95, "");
                assert_eq!(session_group(&session), SessionGroup::Execution);
                assert_eq!(session_phase_number(&session), Some(3));
            }

            it "prefers plan over execution" {
                let session = SessionLink {
                    commands: vec!["/plan:phase-2".to_string()],
                    ..link("s", "Implement Phase 2", 0.95, "")
                };
                assert_eq!(session_group(&session), SessionGroup::Plan);
            }

            it "uses the workflow type" {
                let planning = SessionLink { workflow_type: Some("planning".to_string()), ..link("p", "Chat", 1.0, "") };
                let debug = SessionLink { workflow_type: Some("debug".to_string()), ..link("d", "Chat", 1.0, "") };
                assert_eq!(session_group(&planning), SessionGroup::Plan);
                assert_eq!(session_group(&debug), SessionGroup::Execution);
            }

            it "reads keywords from reasons, commands and metadata labels" {
                let by_reason = SessionLink { reasons: vec!["spike-follow-up".to_string()], ..link("r", "Chat", 1.0, "") };
                let by_command = SessionLink { commands: vec!["/dev:quick-feature".to_string()], ..link("c", "Chat", 1.0, "") };
                let by_label = SessionLink {
                    session_metadata: Some(SessionMetadata {
                        session_type_label: Some("Scoping".to_string()),
                        ..Default::default()
                    }),
                    ..link("l", "Chat", 1.0, "")
                };
                assert_eq!(session_group(&by_reason), SessionGroup::Plan);
                assert_eq!(session_group(&by_command), SessionGroup::Execution);
                assert_eq!(session_group(&by_label), SessionGroup::Plan);
            }

            it "accepts bare phase numbers only from metadata" {
                let bare_title = link("t", "Sprint 4", 1.0, "");
                let bare_metadata = SessionLink {
                    session_metadata: Some(SessionMetadata {
                        related_phases: vec!["4".to_string(), "2".to_string()],
                        ..Default::default()
                    }),
                    ..link("m", "Chat", 1.0, "")
                };
                assert_eq!(session_phase_number(&bare_title), None);
                assert_eq!(session_group(&bare_title), SessionGroup::Other);
                assert_eq!(session_phase_number(&bare_metadata), Some(2));
                assert_eq!(session_group(&bare_metadata), SessionGroup::Execution);
            }
        }

        describe "execution ordering" {
            it "orders by phase regardless of confidence" {
                let sessions = vec![
                    link("p2", "Phase 2", 1.0, "2026-01-02T00:00:00Z"),
                    link("none", "Implement extras", 1.0, "2026-01-03T00:00:00Z"),
                    link("p1", "Phase 1", 0.9, "2026-01-01T00:00:00Z"),
                ];

                let result = classify_sessions(&sessions);
                assert_eq!(ids(&result.groups.execution), vec!["p1", "p2", "none"]);
            }

            it "breaks phase ties by confidence then recency" {
                let sessions = vec![
                    link("older", "Phase 1", 0.95, "2026-01-01T00:00:00Z"),
                    link("newer", "Phase 1", 0.95, "2026-01-05T00:00:00Z"),
                    link("strong", "Phase 1", 0.99, "2025-01-01T00:00:00Z"),
                ];

                let result = classify_sessions(&sessions);
                assert_eq!(ids(&result.groups.execution), vec!["strong", "newer", "older"]);
            }

            it "is deterministic for the same input" {
                let sessions = vec![
                    link("a", "Phase 2", 0.95, "2026-01-01T00:00:00Z"),
                    link("b", "Research", 0.97, "2026-01-02T00:00:00Z"),
                    link("c", "Phase 1", 0.92, "2026-01-03T00:00:00Z"),
                ];

                let first = classify_sessions(&sessions);
                let second = classify_sessions(&sessions);
                assert_eq!(ids(&first.groups.execution), ids(&second.groups.execution));
                assert_eq!(ids(&first.primary), ids(&second.primary));
            }
        }
    }

    describe "classify_documents" {
        it "groups the reference scenario in fixed order" {
            let docs = vec![
                doc("1", "Spike: caching", "spec", ""),
                doc("2", "PRD v1", "prd", ""),
                doc("3", "Phase 2 plan", "phase_plan", ""),
            ];

            let groups = classify_documents(&docs);

            let ids: Vec<DocumentGroupId> = groups.iter().map(|g| g.id).collect();
            assert_eq!(ids, vec![DocumentGroupId::InitialPlanning, DocumentGroupId::Prd, DocumentGroupId::Plans]);
            assert_eq!(titles(&groups[0].docs), vec!["Spike: caching"]);
            assert_eq!(titles(&groups[1].docs), vec!["PRD v1"]);
            assert_eq!(titles(&groups[2].docs), vec!["Phase 2 plan"]);
            assert_eq!(groups[0].label, "Initial Planning");
        }

        it "always puts reports in initial planning" {
            let report = doc("r", "Implementation report", "report", "docs/progress/phase-1.md");
            let groups = classify_documents(&[report]);
            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].id, DocumentGroupId::InitialPlanning);
        }

        it "sends progress paths to progress and the rest to context" {
            let docs = vec![
                doc("p", "Tracker", "notes", "docs/Progress/feature/phase-1.md"),
                doc("c", "Readme", "readme", "README.md"),
            ];
            let groups = classify_documents(&docs);
            assert_eq!(groups[0].id, DocumentGroupId::Progress);
            assert_eq!(groups[1].id, DocumentGroupId::Context);
        }

        it "orders initial planning by keyword rank" {
            let docs = vec![
                doc("1", "Caching spec", "spec", ""),
                doc("2", "Research notes", "notes", ""),
                doc("3", "Findings", "report", ""),
                doc("4", "Spike: eviction", "notes", ""),
                doc("5", "ADR-001 storage", "notes", ""),
            ];
            let groups = classify_documents(&docs);
            assert_eq!(
                titles(&groups[0].docs),
                vec!["ADR-001 storage", "Spike: eviction", "Findings", "Research notes", "Caching spec"]
            );
        }

        it "orders plans by phase with missing phases last" {
            let docs = vec![
                doc("a", "Overview plan", "implementation_plan", "plans/overview.md"),
                doc("b", "Phase 10 plan", "phase_plan", ""),
                doc("c", "Rollout", "phase_plan", "plans/phase-2-rollout.md"),
                doc("d", "Phase 1 plan", "phase_plan", ""),
            ];
            let groups = classify_documents(&docs);
            assert_eq!(
                titles(&groups[0].docs),
                vec!["Phase 1 plan", "Rollout", "Phase 10 plan", "Overview plan"]
            );
        }

        it "orders context by natural title then path" {
            let docs = vec![
                doc("a", "notes 10", "", "a.md"),
                doc("b", "Notes 2", "", "docs/b.md"),
                doc("c", "notes 2", "", "Docs\\A.md"),
            ];
            let groups = classify_documents(&docs);
            assert_eq!(groups[0].id, DocumentGroupId::Context);
            let order: Vec<&str> = groups[0].docs.iter().map(|d| d.id.as_str()).collect();
            assert_eq!(order, vec!["c", "b", "a"]);
        }

        it "returns no groups for no documents" {
            assert!(classify_documents(&[]).is_empty());
        }
    }

    describe "progress" {
        it "computes the reference phase scenario" {
            let phase = Phase { total_tasks: 10, completed_tasks: 6, deferred_tasks: Some(2), ..Default::default() };

            assert_eq!(effective_deferred(&phase), 2);
            assert_eq!(effective_completed(&phase), 6);
            let progress = PhaseProgress::from_phase(&phase);
            assert_eq!(progress.segments, ProgressSegments { done: 4, deferred: 2, incomplete: 4 });
            assert_eq!(progress.percent_complete, 60);
        }

        it "never reports completed below deferred" {
            let phase = Phase { total_tasks: 10, completed_tasks: 1, deferred_tasks: Some(3), ..Default::default() };
            assert_eq!(effective_completed(&phase), 3);
        }

        it "derives feature deferred from phases when absent" {
            let feature = Feature {
                total_tasks: 20,
                completed_tasks: 4,
                deferred_tasks: None,
                phases: vec![
                    Phase { total_tasks: 10, completed_tasks: 2, deferred_tasks: Some(2), ..Default::default() },
                    Phase { total_tasks: 10, completed_tasks: 4, deferred_tasks: None, ..Default::default() },
                    Phase { total_tasks: 0, completed_tasks: 0, deferred_tasks: Some(-4), ..Default::default() },
                ],
                ..Default::default()
            };

            assert_eq!(effective_deferred_feature(&feature), 2);
            assert_eq!(effective_completed_feature(&feature), 4);
            assert!(has_deferred_caveat(&feature));
        }

        it "prefers the explicit feature deferred count" {
            let feature = Feature {
                total_tasks: 10,
                completed_tasks: 5,
                deferred_tasks: Some(0),
                phases: vec![Phase { total_tasks: 10, completed_tasks: 5, deferred_tasks: Some(3), ..Default::default() }],
                ..Default::default()
            };
            assert_eq!(effective_deferred_feature(&feature), 0);
            assert!(!has_deferred_caveat(&feature));
        }

        it "flags deferred features even without deferred tasks" {
            let feature = Feature { status: FeatureStatus::Deferred, total_tasks: 3, ..Default::default() };
            assert_eq!(effective_deferred_feature(&feature), 0);
            assert!(has_deferred_caveat(&feature));
        }

        it "keeps deferred within completed within total for arbitrary counts" {
            for total in -2..6i64 {
                for completed in -2..8i64 {
                    for deferred in [None, Some(-1), Some(0), Some(2), Some(9)] {
                        let phase = Phase { total_tasks: total, completed_tasks: completed, deferred_tasks: deferred, ..Default::default() };
                        let feature = Feature {
                            total_tasks: total,
                            completed_tasks: completed,
                            deferred_tasks: None,
                            phases: vec![phase.clone()],
                            ..Default::default()
                        };
                        let progress = feature_progress(&feature);
                        let counts = progress.counts;
                        assert!(counts.deferred <= counts.completed);
                        assert!(counts.completed <= counts.total);
                        let segments = progress.segments;
                        assert_eq!(segments.done + segments.deferred, counts.completed);
                        assert_eq!(segments.done + segments.deferred + segments.incomplete, counts.total);
                        assert!(effective_deferred(&phase) <= effective_completed(&phase));
                    }
                }
            }
        }

        it "reports zero percent for empty features" {
            let progress = feature_progress(&Feature::default());
            assert_eq!(progress.percent_complete, 0);
            assert!(progress.phases.is_empty());
            assert!(!progress.has_deferred_caveat);
        }
    }

    describe "group_artifacts" {
        it "merges case and whitespace variants into one group" {
            let artifacts = vec![
                artifact("a1", "memory", "Project Notes", "CLAUDE.md"),
                artifact("a2", " Memory ", "project notes  ", " claude.md"),
            ];

            let groups = group_artifacts(&artifacts, &[], &[]);
            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].artifact_ids, vec!["a1", "a2"]);

            let reversed: Vec<Artifact> = artifacts.into_iter().rev().collect();
            let groups = group_artifacts(&reversed, &[], &[]);
            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].artifact_ids.len(), 2);
        }

        it "keeps artifacts with different urls apart" {
            let artifacts = vec![
                Artifact { url: Some("https://a".to_string()), ..artifact("a1", "document", "Doc", "web") },
                Artifact { url: Some("https://b".to_string()), ..artifact("a2", "document", "Doc", "web") },
            ];
            assert_eq!(group_artifacts(&artifacts, &[], &[]).len(), 2);
        }

        it "excludes tag-only artifacts and collects them as command tags" {
            let artifacts = vec![
                artifact("t1", "command_path", "/dev:execute-phase", ""),
                artifact("t2", "feature_slug", "caching", ""),
                artifact("t3", "command_phase", "2", ""),
                artifact("t4", "request", "REQ-1", ""),
                artifact("t5", "feature_slug", "Caching", ""),
                artifact("s1", "skill", "rust", "skills"),
            ];

            let groups = group_artifacts(&artifacts, &[], &[]);
            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].kind, "skill");

            let tags = collect_command_tags(&artifacts);
            assert_eq!(tags.command_paths, vec!["/dev:execute-phase"]);
            assert_eq!(tags.feature_slugs, vec!["caching"]);
            assert_eq!(tags.command_phases, vec!["2"]);
            assert_eq!(tags.requests, vec!["REQ-1"]);
        }

        it "accumulates first description, url, log ids and tool names" {
            let artifacts = vec![
                Artifact { source_log_id: Some("l1".to_string()), source_tool_name: Some("Read".to_string()), ..artifact("a1", "memory", "Notes", "fs") },
                Artifact {
                    description: Some("first".to_string()),
                    source_log_id: Some("l2".to_string()),
                    source_tool_name: Some("Read".to_string()),
                    ..artifact("a2", "memory", "Notes", "fs")
                },
                Artifact { description: Some("second".to_string()), source_log_id: Some("l1".to_string()), ..artifact("a3", "memory", "Notes", "fs") },
            ];

            let groups = group_artifacts(&artifacts, &[], &[]);
            assert_eq!(groups[0].description.as_deref(), Some("first"));
            assert_eq!(groups[0].source_log_ids, vec!["l1", "l2"]);
            assert_eq!(groups[0].source_tool_names, vec!["Read"]);
        }

        it "attaches source tool calls and their threads once" {
            let artifacts = vec![
                Artifact { source_log_id: Some("l1".to_string()), ..artifact("a1", "skill", "review", "skills") },
                Artifact { source_log_id: Some("l1".to_string()), ..artifact("a2", "skill", "review", "skills") },
                Artifact { source_log_id: Some("m1".to_string()), ..artifact("a3", "skill", "review", "skills") },
            ];
            let logs = vec![
                task_call("l1", "{}", Some("t1")),
                SessionLog { id: "m1".to_string(), kind: "message".to_string(), ..Default::default() },
            ];
            let threads = vec![thread("t1", Some("reviewer"))];

            let groups = group_artifacts(&artifacts, &logs, &threads);
            let log_ids: Vec<&str> = groups[0].related_tool_calls.iter().map(|l| l.id.as_str()).collect();
            assert_eq!(log_ids, vec!["l1"]);
            assert_eq!(groups[0].threads.len(), 1);
            assert_eq!(groups[0].threads[0].id, "t1");
        }

        it "resolves threads from source logs that are not tool calls" {
            let artifacts = vec![
                Artifact { source_log_id: Some("m1".to_string()), ..artifact("a1", "agent", "agent-t1", "agents") },
            ];
            let logs = vec![SessionLog {
                id: "m1".to_string(),
                kind: "subagent".to_string(),
                linked_session_id: Some("t1".to_string()),
                ..Default::default()
            }];
            let threads = vec![thread("t1", None)];

            let groups = group_artifacts(&artifacts, &logs, &threads);
            assert!(groups[0].related_tool_calls.is_empty());
            let thread_ids: Vec<&str> = groups[0].threads.iter().map(|t| t.id.as_str()).collect();
            assert_eq!(thread_ids, vec!["t1"]);
        }

        it "keeps tool logs without a call record as evidence" {
            let artifacts = vec![
                Artifact { source_log_id: Some("l1".to_string()), ..artifact("a1", "file", "notes.md", "fs") },
            ];
            let logs = vec![SessionLog { id: "l1".to_string(), kind: "tool".to_string(), ..Default::default() }];

            let groups = group_artifacts(&artifacts, &logs, &[]);
            let log_ids: Vec<&str> = groups[0].related_tool_calls.iter().map(|l| l.id.as_str()).collect();
            assert_eq!(log_ids, vec!["l1"]);
        }

        it "lets a named agent claim a thread found through a non-tool log" {
            let artifacts = vec![
                Artifact { source_log_id: Some("m1".to_string()), ..artifact("a1", "agent", "agent-t1", "agents") },
                Artifact { source_log_id: Some("m2".to_string()), ..artifact("a2", "agent", "reviewer", "agents") },
            ];
            let logs = vec![
                SessionLog { id: "m1".to_string(), kind: "subagent".to_string(), linked_session_id: Some("t1".to_string()), ..Default::default() },
                SessionLog { id: "m2".to_string(), kind: "subagent".to_string(), linked_session_id: Some("t1".to_string()), ..Default::default() },
            ];
            let threads = vec![thread("t1", None)];

            let groups = group_artifacts(&artifacts, &logs, &threads);
            let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
            assert_eq!(titles, vec!["reviewer"]);
        }

        it "attaches sub-agent calls to the matching agent group" {
            let artifacts = vec![artifact("a1", "agent", "reviewer", "agents")];
            let logs = vec![
                task_call("l1", r#"{"subagent_type":"reviewer","prompt":"check"}"#, None),
                task_call("l2", r#"{"subagent_type":"planner"}"#, None),
            ];

            let groups = group_artifacts(&artifacts, &logs, &[]);
            let log_ids: Vec<&str> = groups[0].related_tool_calls.iter().map(|l| l.id.as_str()).collect();
            assert_eq!(log_ids, vec!["l1"]);
        }

        it "attaches nothing for unparsable arguments" {
            let artifacts = vec![artifact("a1", "agent", "reviewer", "agents")];
            let logs = vec![task_call("l1", "{subagent_type: reviewer", None)];

            let groups = group_artifacts(&artifacts, &logs, &[]);
            assert_eq!(groups.len(), 1);
            assert!(groups[0].related_tool_calls.is_empty());
        }

        it "matches agent groups by thread display name" {
            let artifacts = vec![artifact("a1", "agent", "Explorer", "agents")];
            let logs = vec![task_call("l1", "{}", Some("t1"))];
            let threads = vec![thread("t1", Some("explorer"))];

            let groups = group_artifacts(&artifacts, &logs, &threads);
            assert_eq!(groups[0].related_tool_calls.len(), 1);
            assert_eq!(groups[0].threads[0].id, "t1");
        }

        it "drops placeholder agent groups claimed by a named agent" {
            let artifacts = vec![
                Artifact { source_log_id: Some("l1".to_string()), ..artifact("a1", "agent", "agent-t1", "agents") },
                artifact("a2", "agent", "reviewer", "agents"),
                Artifact { source_log_id: Some("l2".to_string()), ..artifact("a3", "agent", "agent-t2", "agents") },
            ];
            let logs = vec![
                task_call("l1", r#"{"subagent_type":"reviewer"}"#, Some("t1")),
                task_call("l2", "{}", Some("t2")),
            ];
            let threads = vec![thread("t1", None), thread("t2", None)];

            let groups = group_artifacts(&artifacts, &logs, &threads);
            let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
            assert_eq!(titles, vec!["agent-t2", "reviewer"]);
        }

        it "sorts by member count then title" {
            let artifacts = vec![
                artifact("1", "skill", "beta", "s"),
                artifact("2", "skill", "Alpha", "s"),
                artifact("3", "skill", "gamma", "s"),
                artifact("4", "skill", "gamma", "s"),
            ];

            let groups = group_artifacts(&artifacts, &[], &[]);
            let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
            assert_eq!(titles, vec!["gamma", "Alpha", "beta"]);
        }

        it "returns nothing for empty input" {
            assert!(group_artifacts(&[], &[], &[]).is_empty());
            assert!(collect_command_tags(&[]).is_empty());
        }
    }
}
