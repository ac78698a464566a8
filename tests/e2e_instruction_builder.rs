// End-to-end tests for the instruction builders


#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use ingl_cli::{
        codec::GemClass,
        constants::{METAPLEX_PROGRAM_ID, STAKE_CONFIG_ID},
        error::AppError,
        instruction::*,
        pda::*,
    };
    use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program, sysvar};

    fn roles(ix: &Instruction) -> Vec<(bool, bool)> {
        ix.accounts.iter().map(|a| (a.is_signer, a.is_writable)).collect()
    }

    fn gem_params() -> GemParams {
        GemParams {
            program_id: generate_test_pubkey(),
            payer: generate_test_pubkey(),
            mint: generate_test_pubkey(),
        }
    }

    fn vote_params(mints: Vec<Pubkey>, num_nfts: u8) -> VoteProposalParams {
        VoteProposalParams {
            program_id: generate_test_pubkey(),
            payer: generate_test_pubkey(),
            proposal_numeration: 3,
            mints,
            num_nfts,
            validator_index: 1,
        }
    }

    #[test]
    fn test_mint_nft_layout() {
        let params = MintNftParams {
            program_id: generate_test_pubkey(),
            payer: generate_test_pubkey(),
            mint: generate_test_pubkey(),
            class: GemClass::Diamond,
        };
        let ix = build_instruction_mint_nft(&params).expect("mint ix");

        assert_eq!(ix.program_id, params.program_id);
        assert_eq!(ix.data, vec![0, 1]);
        assert_eq!(ix.accounts.len(), 19);
        assert_eq!(ix.accounts[0].pubkey, params.payer);
        assert_eq!(ix.accounts[1].pubkey, params.mint);

        // only the payer and the fresh mint sign
        let signers: Vec<_> = ix.accounts.iter().filter(|a| a.is_signer).map(|a| a.pubkey).collect();
        assert_eq!(signers, vec![params.payer, params.mint]);

        let (gem, _) = derive_gem_account_pda(&params.program_id, &params.mint).unwrap();
        assert_eq!(ix.accounts[10].pubkey, gem);
        assert!(ix.accounts[10].is_writable);
        assert_eq!(ix.accounts[3].pubkey, derive_associated_token_address(&params.payer, &params.mint));
        assert_eq!(ix.accounts[18].pubkey, METAPLEX_PROGRAM_ID);
    }

    #[test]
    fn test_mint_collection_layout() {
        let program_id = generate_test_pubkey();
        let payer = generate_test_pubkey();
        let ix = build_instruction_mint_collection(&program_id, &payer).unwrap();
        assert_eq!(ix.data, vec![1]);
        assert_eq!(ix.accounts.len(), 20);

        let (mint_authority, _) = derive_mint_authority_pda(&program_id).unwrap();
        let (council_authority, _) = derive_council_mint_authority_pda(&program_id).unwrap();
        assert_eq!(ix.accounts[3].pubkey, mint_authority);
        assert_eq!(ix.accounts[12].pubkey, council_authority);
        assert_ne!(mint_authority, council_authority);
    }

    #[test]
    fn test_single_gem_operation_layouts() {
        let params = gem_params();

        let redeem = build_instruction_redeem(&params).unwrap();
        assert_eq!(redeem.data, vec![2]);
        assert_eq!(redeem.accounts.len(), 13);
        assert_eq!(redeem.accounts[10].pubkey, derive_treasury_pda(&params.program_id).unwrap().0);

        let init = build_instruction_init_rarity_imprint(&params).unwrap();
        assert_eq!(init.data, vec![10]);
        assert_eq!(init.accounts.len(), 8);

        let imprint = build_instruction_imprint_rarity(&params).unwrap();
        assert_eq!(imprint.data, vec![3]);
        assert_eq!(imprint.accounts.len(), 13);
        assert!(imprint.accounts[7..11].iter().all(|a| !a.is_signer && !a.is_writable));

        let allocate = build_instruction_allocate_sol(&params).unwrap();
        assert_eq!(allocate.data, vec![4]);
        assert_eq!(
            roles(&allocate),
            vec![
                (true, true),
                (false, false),
                (false, true),
                (false, true),
                (false, true),
                (false, true),
                (false, true),
                (false, false),
            ]
        );
        assert_eq!(allocate.accounts[7].pubkey, system_program::id());
    }

    #[test]
    fn test_vote_account_layouts_follow_numeration() {
        let params = VoteAccountParams {
            program_id: generate_test_pubkey(),
            validator: generate_test_pubkey(),
            proposal_numeration: 4,
        };
        let create = build_instruction_create_vote_account(&params).unwrap();
        assert_eq!(create.data, vec![6]);
        assert_eq!(create.accounts.len(), 19);

        let (vote, _) = derive_vote_account_pda(&params.program_id, 4).unwrap();
        let (proposal, _) = derive_proposal_pda(&params.program_id, 4).unwrap();
        assert_eq!(create.accounts[1].pubkey, vote);
        assert_eq!(create.accounts[5].pubkey, proposal);
        assert_eq!(create.accounts[12].pubkey, derive_stake_account_pda(&params.program_id, &vote).unwrap().0);
        assert_eq!(create.accounts[15].pubkey, STAKE_CONFIG_ID);

        let change = build_instruction_change_validator_identity(&params).unwrap();
        assert_eq!(change.data, vec![7]);
        assert_eq!(change.accounts.len(), 5);
        assert_eq!(change.accounts[1].pubkey, vote);
        assert_eq!(change.accounts[2].pubkey, derive_vote_data_pda(&params.program_id, &vote).unwrap().0);
    }

    #[test]
    fn test_delegate_and_undelegate_layouts() {
        let params = DelegateParams {
            program_id: generate_test_pubkey(),
            payer: generate_test_pubkey(),
            mint: generate_test_pubkey(),
            vote_account: generate_test_pubkey(),
        };
        let delegate = build_instruction_delegate_sol(&params).unwrap();
        assert_eq!(delegate.data, vec![8]);
        assert_eq!(delegate.accounts.len(), 11);
        assert_eq!(delegate.accounts[7].pubkey, sysvar::clock::id());
        assert!(!delegate.accounts[7].is_writable);

        let undelegate = build_instruction_undelegate_sol(&params).unwrap();
        assert_eq!(undelegate.data, vec![9]);
        assert_eq!(undelegate.accounts.len(), 8);
        assert_eq!(undelegate.accounts[1].pubkey, derive_pd_pool_pda(&params.program_id).unwrap().0);
        assert_eq!(undelegate.accounts[2].pubkey, params.vote_account);
    }

    #[test]
    fn test_proposal_lifecycle_layouts() {
        let program_id = generate_test_pubkey();
        let payer = generate_test_pubkey();
        let (global, _) = derive_global_gem_pda(&program_id).unwrap();

        let create = build_instruction_create_validator_proposal(&program_id, &payer, 5).unwrap();
        assert_eq!(create.data, vec![12]);
        assert_eq!(create.accounts.len(), 4);
        assert_eq!(create.accounts[1].pubkey, global);
        assert_eq!(create.accounts[2].pubkey, derive_proposal_pda(&program_id, 5).unwrap().0);

        let finalize = build_instruction_finalize_proposal(&program_id, &payer, 4).unwrap();
        assert_eq!(finalize.data, vec![14]);
        assert_eq!(roles(&finalize), vec![(true, true), (false, true), (false, true)]);
        assert_eq!(finalize.accounts[1].pubkey, derive_proposal_pda(&program_id, 4).unwrap().0);
        assert_eq!(finalize.accounts[2].pubkey, global);
    }

    #[test]
    fn test_vote_account_count_law() {
        for n in 1..=10u8 {
            let mints: Vec<Pubkey> = (0..n).map(|_| generate_test_pubkey()).collect();
            let params = vote_params(mints.clone(), n);
            let ix = build_instruction_vote_validator_proposal(&params).expect("vote ix");

            assert_eq!(ix.accounts.len(), 2 + 3 * n as usize);
            assert_eq!(ix.data[0], 13);
            assert_eq!(ix.data[1], n);
            assert_eq!(&ix.data[2..6], &1u32.to_le_bytes());

            // per-mint triples keep the caller's order
            for (i, mint) in mints.iter().enumerate() {
                let group = &ix.accounts[2 + 3 * i..5 + 3 * i];
                assert_eq!(group[0].pubkey, *mint);
                assert_eq!(group[1].pubkey, derive_associated_token_address(&params.payer, mint));
                assert_eq!(group[2].pubkey, derive_gem_account_pda(&params.program_id, mint).unwrap().0);
                assert!(!group[0].is_writable && !group[1].is_writable && group[2].is_writable);
            }
        }
    }

    #[test]
    fn test_vote_preconditions() {
        let two = vec![generate_test_pubkey(), generate_test_pubkey()];
        let mismatch = build_instruction_vote_validator_proposal(&vote_params(two, 3));
        assert!(matches!(mismatch, Err(AppError::EncodingPrecondition(_))));

        let empty = build_instruction_vote_validator_proposal(&vote_params(vec![], 0));
        assert!(matches!(empty, Err(AppError::EncodingPrecondition(_))));

        let eleven: Vec<Pubkey> = (0..11).map(|_| generate_test_pubkey()).collect();
        let too_many = build_instruction_vote_validator_proposal(&vote_params(eleven, 11));
        assert!(matches!(too_many, Err(AppError::EncodingPrecondition(_))));
    }

    #[test]
    fn test_register_validator_id() {
        let program_id = generate_test_pubkey();
        let payer = generate_test_pubkey();
        let ix = build_instruction_register_validator_id(&program_id, &payer).unwrap();
        assert_eq!(ix.data, vec![11]);
        assert_eq!(roles(&ix), vec![(true, true), (false, true)]);
    }
}
