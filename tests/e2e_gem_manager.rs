// End-to-end tests for the fetch, build, submit flows against a mocked RPC node


#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use async_trait::async_trait;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use ingl_cli::{
        codec::GemClass,
        error::{AppError, AppResult},
        gems::{GemManager, Submission},
        pda::*,
        solana_client::{AccountReader, TransactionSender},
        state::{FundsLocation, Rarity},
    };
    use mockall::mock;
    use solana_sdk::{
        compute_budget,
        hash::Hash,
        instruction::CompiledInstruction,
        pubkey::Pubkey,
        signature::{Keypair, Signature, Signer},
        transaction::Transaction,
    };

    mock! {
        pub Rpc {}

        #[async_trait]
        impl AccountReader for Rpc {
            async fn get_account_data(&self, address: &Pubkey) -> AppResult<Vec<u8>>;
        }

        #[async_trait]
        impl TransactionSender for Rpc {
            async fn get_latest_blockhash(&self) -> AppResult<Hash>;
            async fn send_transaction(&self, tx: &Transaction) -> AppResult<Signature>;
        }
    }

    /// Last instruction of the transaction, which is always the program call.
    fn program_ix(tx: &Transaction) -> &CompiledInstruction {
        tx.message.instructions.last().expect("instruction")
    }

    fn account_at(tx: &Transaction, position: usize) -> Pubkey {
        let ix = program_ix(tx);
        tx.message.account_keys[ix.accounts[position] as usize]
    }

    fn manager(rpc: MockRpc) -> GemManager<MockRpc> {
        GemManager::new(&test_config(), rpc, Keypair::new())
    }

    fn serve_global(rpc: &mut MockRpc, proposal_numeration: u32, ongoing: bool) {
        let program_id = test_config().program_id;
        let (global, _) = derive_global_gem_pda(&program_id).unwrap();
        let data = account_bytes(&sample_global_gems(proposal_numeration, ongoing));
        rpc.expect_get_account_data()
            .withf(move |address| *address == global)
            .returning(move |_| Ok(data.clone()));
    }

    fn accept_blockhash(rpc: &mut MockRpc) {
        rpc.expect_get_latest_blockhash().returning(|| Ok(Hash::new_unique()));
    }

    #[tokio::test]
    async fn test_finalize_uses_counter_minus_one() {
        let program_id = test_config().program_id;
        let expected = derive_proposal_pda(&program_id, 4).unwrap().0;

        let mut rpc = MockRpc::new();
        serve_global(&mut rpc, 5, true);
        accept_blockhash(&mut rpc);
        rpc.expect_send_transaction()
            .withf(move |tx| program_ix(tx).data == vec![14] && account_at(tx, 1) == expected)
            .times(1)
            .returning(|tx| Ok(tx.signatures[0]));

        let result = manager(rpc).finalize_proposal().await.unwrap();
        assert!(matches!(result, Submission::Sent(_)));
    }

    #[tokio::test]
    async fn test_create_proposal_uses_current_counter() {
        let program_id = test_config().program_id;
        let expected = derive_proposal_pda(&program_id, 5).unwrap().0;

        let mut rpc = MockRpc::new();
        serve_global(&mut rpc, 5, false);
        accept_blockhash(&mut rpc);
        rpc.expect_send_transaction()
            .withf(move |tx| program_ix(tx).data == vec![12] && account_at(tx, 2) == expected)
            .times(1)
            .returning(|tx| Ok(tx.signatures[0]));

        manager(rpc).create_validator_proposal().await.unwrap();
    }

    #[tokio::test]
    async fn test_finalize_without_any_proposal_fails_locally() {
        let mut rpc = MockRpc::new();
        serve_global(&mut rpc, 0, false);
        rpc.expect_send_transaction().times(0);

        let err = manager(rpc).finalize_proposal().await.unwrap_err();
        assert!(matches!(err, AppError::EncodingPrecondition(_)));
    }

    #[tokio::test]
    async fn test_malformed_global_state_aborts_before_submission() {
        let mut rpc = MockRpc::new();
        rpc.expect_get_account_data().returning(|_| Ok(vec![1, 2, 3]));
        rpc.expect_send_transaction().times(0);

        let err = manager(rpc).finalize_proposal().await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_missing_global_account_is_reported() {
        let mut rpc = MockRpc::new();
        rpc.expect_get_account_data().returning(|address| Err(AppError::AccountNotFound(*address)));

        let err = manager(rpc).create_validator_proposal().await.unwrap_err();
        assert!(matches!(err, AppError::AccountNotFound(_)));
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn test_remote_rejection_is_surfaced_once() {
        let mut rpc = MockRpc::new();
        serve_global(&mut rpc, 3, true);
        accept_blockhash(&mut rpc);
        rpc.expect_send_transaction()
            .times(1)
            .returning(|_| Err(AppError::RemoteRejection("custom program error: 0x1".to_string())));

        let err = manager(rpc).finalize_proposal().await.unwrap_err();
        assert!(matches!(err, AppError::RemoteRejection(_)));
    }

    #[tokio::test]
    async fn test_vote_checks_candidate_index_before_submitting() {
        let program_id = test_config().program_id;
        let (global, _) = derive_global_gem_pda(&program_id).unwrap();
        let global_data = account_bytes(&sample_global_gems(2, true));
        let proposal_data = account_bytes(&sample_proposal(3));

        let mut rpc = MockRpc::new();
        rpc.expect_get_account_data().returning(move |address| {
            if *address == global {
                Ok(global_data.clone())
            } else {
                Ok(proposal_data.clone())
            }
        });
        rpc.expect_send_transaction().times(0);

        let err = manager(rpc)
            .vote_validator_proposal(3, vec![generate_test_pubkey()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EncodingPrecondition(_)));
    }

    #[tokio::test]
    async fn test_vote_on_latest_proposal() {
        let program_id = test_config().program_id;
        let (global, _) = derive_global_gem_pda(&program_id).unwrap();
        let (proposal, _) = derive_proposal_pda(&program_id, 1).unwrap();
        let global_data = account_bytes(&sample_global_gems(2, true));
        let proposal_data = account_bytes(&sample_proposal(3));
        let mints = vec![generate_test_pubkey(), generate_test_pubkey()];

        let mut rpc = MockRpc::new();
        rpc.expect_get_account_data()
            .withf(move |address| *address == global)
            .returning(move |_| Ok(global_data.clone()));
        rpc.expect_get_account_data()
            .withf(move |address| *address == proposal)
            .times(1)
            .returning(move |_| Ok(proposal_data.clone()));
        accept_blockhash(&mut rpc);
        rpc.expect_send_transaction()
            .withf(move |tx| {
                let ix = program_ix(tx);
                ix.accounts.len() == 8 && ix.data == vec![13, 2, 2, 0, 0, 0] && account_at(tx, 1) == proposal
            })
            .times(1)
            .returning(|tx| Ok(tx.signatures[0]));

        manager(rpc).vote_validator_proposal(2, mints).await.unwrap();
    }

    #[tokio::test]
    async fn test_undelegate_reads_vote_account_from_gem() {
        let program_id = test_config().program_id;
        let mint = generate_test_pubkey();
        let vote_account = generate_test_pubkey();
        let gem = sample_gem(FundsLocation::VoteAccount { vote_account_id: vote_account.to_bytes() }, None, None);
        let data = account_bytes(&gem);
        let (gem_address, _) = derive_gem_account_pda(&program_id, &mint).unwrap();

        let mut rpc = MockRpc::new();
        rpc.expect_get_account_data()
            .withf(move |address| *address == gem_address)
            .returning(move |_| Ok(data.clone()));
        accept_blockhash(&mut rpc);
        rpc.expect_send_transaction()
            .withf(move |tx| program_ix(tx).data == vec![9] && account_at(tx, 2) == vote_account)
            .times(1)
            .returning(|tx| Ok(tx.signatures[0]));

        manager(rpc).undelegate(&mint).await.unwrap();
    }

    #[tokio::test]
    async fn test_undelegate_requires_delegated_gem() {
        let data = account_bytes(&sample_gem(FundsLocation::PDPool, None, None));
        let mut rpc = MockRpc::new();
        rpc.expect_get_account_data().returning(move |_| Ok(data.clone()));
        rpc.expect_send_transaction().times(0);

        let err = manager(rpc).undelegate(&generate_test_pubkey()).await.unwrap_err();
        assert!(matches!(err, AppError::EncodingPrecondition(_)));
    }

    async fn imprint_with(rarity: Option<Rarity>, seed_time: Option<u32>, expected_op: Option<u8>) -> AppResult<Submission> {
        let data = account_bytes(&sample_gem(FundsLocation::MintingPool, rarity, seed_time));
        let mut rpc = MockRpc::new();
        rpc.expect_get_account_data().returning(move |_| Ok(data.clone()));
        accept_blockhash(&mut rpc);
        match expected_op {
            Some(op) => {
                rpc.expect_send_transaction()
                    .withf(move |tx| program_ix(tx).data == vec![op])
                    .times(1)
                    .returning(|tx| Ok(tx.signatures[0]));
            }
            None => {
                rpc.expect_send_transaction().times(0);
            }
        }
        manager(rpc).imprint_rarity(&generate_test_pubkey()).await
    }

    #[tokio::test]
    async fn test_imprint_rarity_picks_step_from_gem_state() {
        imprint_with(None, None, Some(10)).await.unwrap();
        imprint_with(None, Some(1_700_000_500), Some(3)).await.unwrap();
        let err = imprint_with(Some(Rarity::Rare), Some(1_700_000_500), None).await.unwrap_err();
        assert!(matches!(err, AppError::EncodingPrecondition(_)));
    }

    #[tokio::test]
    async fn test_mint_signs_with_payer_first_and_fresh_mint() {
        let mut rpc = MockRpc::new();
        accept_blockhash(&mut rpc);
        rpc.expect_send_transaction()
            .withf(|tx| {
                let ixs = &tx.message.instructions;
                let budget = tx.message.account_keys[ixs[0].program_id_index as usize];
                ixs.len() == 2
                    && budget == compute_budget::id()
                    && program_ix(tx).data == vec![0, 3]
                    && tx.signatures.len() == 2
                    && tx.verify().is_ok()
            })
            .times(1)
            .returning(|tx| Ok(tx.signatures[0]));

        let payer = Keypair::new();
        let payer_key = payer.pubkey();
        let manager = GemManager::new(&test_config(), rpc, payer);
        let (mint, submission) = manager.mint_nft(GemClass::Emerald).await.unwrap();
        assert_ne!(mint, payer_key);
        assert!(matches!(submission, Submission::Sent(_)));
    }

    #[tokio::test]
    async fn test_dry_run_never_submits() {
        let mut rpc = MockRpc::new();
        accept_blockhash(&mut rpc);
        rpc.expect_send_transaction().times(0);

        let payer = Keypair::new();
        let payer_key = payer.pubkey();
        let manager = GemManager::new(&test_config(), rpc, payer).with_dry_run(true);
        let submission = manager.register_validator_id().await.unwrap();

        let Submission::DryRun(encoded) = submission else {
            panic!("expected a dry run");
        };
        let tx: Transaction = bincode::deserialize(&STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(tx.message.account_keys[0], payer_key);
        assert_eq!(program_ix(&tx).data, vec![11]);
        assert!(tx.verify().is_ok());
    }
}
