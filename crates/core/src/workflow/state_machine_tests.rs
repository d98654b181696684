//! Tests for the investment lifecycle transition table.

#[cfg(test)]
mod tests {
    use crate::workflow::{
        available_actions, awaiting_actor, required_next_action, transition, ActorRole,
        FailureKind, InvestmentStatus, TransitionRejection, WorkflowAction,
    };

    use InvestmentStatus::*;

    fn decline() -> WorkflowAction {
        WorkflowAction::Decline { reason: None }
    }

    /// (from, action, to) for every row of the table except decline.
    fn table() -> Vec<(InvestmentStatus, WorkflowAction, InvestmentStatus)> {
        vec![
            (Pending, WorkflowAction::SignSubscription, PendingApproval),
            (
                PendingApproval,
                WorkflowAction::SendPromissoryNote,
                PromissoryNotePending,
            ),
            (
                PromissoryNotePending,
                WorkflowAction::SignPromissoryInvestor,
                PromissoryNotePending,
            ),
            (
                PromissoryNotePending,
                WorkflowAction::SignPromissoryAdmin,
                BankDetailsPending,
            ),
            (
                BankDetailsPending,
                WorkflowAction::ConfirmWireDetails,
                FundsPending,
            ),
            (FundsPending, WorkflowAction::VerifyFunds, PlaidPending),
            (
                PlaidPending,
                WorkflowAction::LinkBankAccount,
                InvestorOnboardingComplete,
            ),
            (InvestorOnboardingComplete, WorkflowAction::Activate, Active),
        ]
    }

    // ==================== Table rows ====================

    #[test]
    fn test_every_table_row_yields_its_next_state() {
        for (from, action, to) in table() {
            let actor = action.authorized_actor();
            assert_eq!(
                transition(from, &action, actor),
                Ok(to),
                "{} from {}",
                action,
                from
            );
        }
    }

    #[test]
    fn test_decline_from_every_non_terminal_state() {
        for status in InvestmentStatus::ALL.iter().filter(|s| !s.is_terminal()) {
            assert_eq!(
                transition(*status, &decline(), ActorRole::Admin),
                Ok(Cancelled)
            );
        }
    }

    #[test]
    fn test_decline_reason_does_not_change_outcome() {
        let action = WorkflowAction::Decline {
            reason: Some("Failed KYC".to_string()),
        };
        assert_eq!(
            transition(FundsPending, &action, ActorRole::Admin),
            Ok(Cancelled)
        );
    }

    // ==================== Rejections ====================

    #[test]
    fn test_pairs_outside_table_are_invalid() {
        let rows = table();
        for status in InvestmentStatus::ALL.iter().filter(|s| !s.is_terminal()) {
            for action in WorkflowAction::all() {
                if matches!(action, WorkflowAction::Decline { .. }) {
                    continue;
                }
                let in_table = rows.iter().any(|(from, a, _)| from == status && *a == action);
                if in_table {
                    continue;
                }
                let result = transition(*status, &action, action.authorized_actor());
                assert!(
                    matches!(result, Err(TransitionRejection::InvalidTransition { .. })),
                    "{} from {} should be invalid, got {:?}",
                    action,
                    status,
                    result
                );
            }
        }
    }

    #[test]
    fn test_wrong_actor_is_reported_even_for_valid_pairs() {
        let result = transition(Pending, &WorkflowAction::SignSubscription, ActorRole::Admin);
        assert_eq!(
            result,
            Err(TransitionRejection::WrongActor {
                action: "sign_subscription",
                expected: ActorRole::Investor,
                actual: ActorRole::Admin,
            })
        );
    }

    #[test]
    fn test_wrong_actor_takes_precedence_over_invalid_pair() {
        // Activate is not valid from Pending either, but the investor may never activate.
        let result = transition(Pending, &WorkflowAction::Activate, ActorRole::Investor);
        assert_eq!(result.unwrap_err().kind(), FailureKind::WrongActor);
    }

    #[test]
    fn test_investor_cannot_decline() {
        let result = transition(FundsPending, &decline(), ActorRole::Investor);
        assert_eq!(result.unwrap_err().kind(), FailureKind::WrongActor);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for status in [Active, Cancelled] {
            for action in WorkflowAction::all() {
                for actor in [ActorRole::Investor, ActorRole::Admin] {
                    assert_eq!(
                        transition(status, &action, actor),
                        Err(TransitionRejection::AlreadyTerminal { status })
                    );
                }
            }
        }
    }

    #[test]
    fn test_rejection_messages_are_actionable() {
        let err = transition(FundsPending, &WorkflowAction::VerifyFunds, ActorRole::Investor)
            .unwrap_err();
        assert_eq!(err.to_string(), "Only the admin can perform this step");

        let err = transition(Active, &WorkflowAction::Activate, ActorRole::Admin).unwrap_err();
        assert!(err.to_string().contains("already active"));
    }

    // ==================== Derived labels ====================

    #[test]
    fn test_available_actions_follow_table() {
        assert_eq!(
            available_actions(Pending, ActorRole::Investor),
            vec![WorkflowAction::SignSubscription]
        );
        assert_eq!(
            available_actions(PendingApproval, ActorRole::Admin),
            vec![WorkflowAction::SendPromissoryNote, decline()]
        );
        assert_eq!(
            available_actions(PromissoryNotePending, ActorRole::Admin),
            vec![WorkflowAction::SignPromissoryAdmin, decline()]
        );
        assert!(available_actions(Active, ActorRole::Admin).is_empty());
    }

    #[test]
    fn test_awaiting_actor_matches_next_row() {
        for (from, action, _) in table() {
            if from == PromissoryNotePending {
                continue;
            }
            assert_eq!(awaiting_actor(from), Some(action.authorized_actor()));
        }
        assert_eq!(awaiting_actor(Active), None);
        assert_eq!(awaiting_actor(Cancelled), None);
    }

    #[test]
    fn test_promissory_note_pending_accepts_both_signers() {
        // The turn stays with the investor until the note itself says otherwise
        assert_eq!(awaiting_actor(PromissoryNotePending), Some(ActorRole::Investor));
        assert!(transition(
            PromissoryNotePending,
            &WorkflowAction::SignPromissoryInvestor,
            ActorRole::Investor
        )
        .is_ok());
        assert_eq!(
            transition(
                PromissoryNotePending,
                &WorkflowAction::SignPromissoryAdmin,
                ActorRole::Admin
            ),
            Ok(BankDetailsPending)
        );
    }

    #[test]
    fn test_required_next_action_is_defined_for_every_status() {
        for status in InvestmentStatus::ALL {
            assert!(!required_next_action(status).is_empty());
        }
        assert_eq!(
            required_next_action(BankDetailsPending),
            "Investor must confirm the wire transfer details"
        );
    }

    // ==================== Serialization ====================

    #[test]
    fn test_action_wire_names() {
        let json = serde_json::to_string(&WorkflowAction::SignPromissoryAdmin).unwrap();
        assert_eq!(json, r#"{"type":"sign_promissory_admin"}"#);

        let parsed: WorkflowAction =
            serde_json::from_str(r#"{"type":"decline","reason":"duplicate"}"#).unwrap();
        assert_eq!(
            parsed,
            WorkflowAction::Decline {
                reason: Some("duplicate".to_string())
            }
        );

        assert!(serde_json::from_str::<WorkflowAction>(r#"{"type":"approve_all"}"#).is_err());
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in InvestmentStatus::ALL {
            assert_eq!(status.as_str().parse::<InvestmentStatus>(), Ok(status));
        }
        assert!("paused".parse::<InvestmentStatus>().is_err());
    }
}
