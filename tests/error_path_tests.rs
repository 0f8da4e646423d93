//! Error-path tests: every failure is whole-request and names its cause

use dash_sign::serialization::*;
use dash_sign::transaction::*;
use dash_sign::*;

const UNSIGNED_TX_HEX: &str = "01000000012f6797c5b7f9b50952568d617d1d8206657515553c1656e267d8928efa27edae0000000000ffffffff0200e1f505000000001976a914a3a8d59213e02c46257914e8cf7149d4260ab9fe88aca0e309e50f0000001976a914daa46815060c0372118e52ccf970c4c54031055b88ac00000000";

fn unsigned() -> Vec<u8> {
    hex::decode(UNSIGNED_TX_HEX).unwrap()
}

fn key() -> KeyPair {
    KeyPair::from_wif(
        "cV9nTtEJwgLe7pmSALvzrtQbjtP7zg8phhzDqgEURvWTEmSAVGjH",
        Network::DashTestnet,
    )
    .unwrap()
}

fn coin() -> Coin {
    let tx = parse_transaction(&unsigned()).unwrap();
    Coin::new(
        tx.inputs[0].prevout,
        68367150000,
        hex::decode("76a914daa46815060c0372118e52ccf970c4c54031055b88ac").unwrap(),
    )
}

fn sign(bytes: &[u8], coins: &[Coin], keys: &[KeyPair]) -> Result<String> {
    sign_raw_transaction(bytes, coins, keys, SignOptions::default())
}

#[test]
fn test_empty_input_is_malformed() {
    assert!(matches!(sign(&[], &[coin()], &[key()]), Err(SignError::MalformedData(_))));
}

#[test]
fn test_every_truncation_is_malformed() {
    let bytes = unsigned();
    for len in 0..bytes.len() {
        assert!(
            matches!(parse_transaction(&bytes[..len]), Err(SignError::MalformedData(_))),
            "truncation at {} parsed",
            len
        );
    }
}

#[test]
fn test_trailing_bytes_are_malformed() {
    let mut bytes = unsigned();
    bytes.push(0x00);
    assert!(matches!(sign(&bytes, &[coin()], &[key()]), Err(SignError::MalformedData(_))));
}

#[test]
fn test_oversized_input_count_is_malformed() {
    // Version then an input count of 0xffffffff with nothing behind it
    let bytes = [1, 0, 0, 0, 0xfe, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0];
    assert!(matches!(parse_transaction(&bytes), Err(SignError::MalformedData(_))));
}

#[test]
fn test_oversized_script_length_is_malformed() {
    let mut bytes = unsigned();
    // Script length byte of input 0 sits after version, count, hash and index
    bytes[4 + 1 + 32 + 4] = 0xfc;
    assert!(matches!(parse_transaction(&bytes), Err(SignError::MalformedData(_))));
}

#[test]
fn test_non_minimal_varint_is_malformed() {
    let mut bytes = vec![1, 0, 0, 0, 0xfd, 0x01, 0x00];
    bytes.extend_from_slice(&unsigned()[5..]);
    assert!(matches!(parse_transaction(&bytes), Err(SignError::MalformedData(_))));
}

#[test]
fn test_zero_inputs_is_malformed() {
    let bytes = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    assert!(matches!(sign(&bytes, &[coin()], &[key()]), Err(SignError::MalformedData(_))));
}

#[test]
fn test_missing_coin_names_outpoint() {
    let expected = coin().outpoint;
    let mut wrong = coin();
    wrong.outpoint.index = 7;

    match sign(&unsigned(), &[wrong], &[key()]) {
        Err(SignError::CoinNotFound(outpoint)) => assert_eq!(outpoint, expected),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(sign(&unsigned(), &[], &[key()]), Err(SignError::CoinNotFound(_))));
}

#[test]
fn test_conflicting_duplicate_coins_are_malformed() {
    let mut other = coin();
    other.output.value += 1;
    assert!(matches!(
        sign(&unsigned(), &[coin(), other], &[key()]),
        Err(SignError::MalformedData(_))
    ));
}

#[test]
fn test_identical_duplicate_coins_are_accepted() {
    assert!(sign(&unsigned(), &[coin(), coin()], &[key()]).is_ok());
}

#[test]
fn test_no_keys_names_input() {
    assert!(matches!(
        sign(&unsigned(), &[coin()], &[]),
        Err(SignError::NoMatchingKey { input_index: 0 })
    ));
}

#[test]
fn test_compression_mismatch_is_no_match() {
    // Same scalar, uncompressed encoding hashes to a different address
    let uncompressed = KeyPair::from_secret_bytes(
        &hex::decode("e1e185425313430fe61382fd83d155653f10cc98103ae30b2310933fb96f2486").unwrap(),
        false,
    )
    .unwrap();
    assert!(matches!(
        sign(&unsigned(), &[coin()], &[uncompressed]),
        Err(SignError::NoMatchingKey { input_index: 0 })
    ));
}

#[test]
fn test_non_p2pkh_coin_is_no_match() {
    let mut p2sh = coin();
    p2sh.output.script_pubkey =
        hex::decode("a914daa46815060c0372118e52ccf970c4c54031055b87").unwrap();
    assert!(matches!(
        sign(&unsigned(), &[p2sh], &[key()]),
        Err(SignError::NoMatchingKey { input_index: 0 })
    ));
}

#[test]
fn test_unsupported_sighash_types() {
    let signer = TransactionSigner::default();
    for ty in [0x00u32, 0x02, 0x03, 0x41, 0x81, 0x83] {
        match signer.sign_with_sighash(&unsigned(), &[coin()], &[key()], ty) {
            Err(SignError::UnsupportedSighashType(t)) => assert_eq!(t, ty),
            other => panic!("unexpected result for {:#x}: {:?}", ty, other),
        }
    }
}

#[test]
fn test_invalid_private_keys() {
    let cases = [
        "",
        "not base58 0OIl",
        // Checksum altered
        "cV9nTtEJwgLe7pmSALvzrtQbjtP7zg8phhzDqgEURvWTEmSAVGjJ",
        // An address, not a key
        "ygFX7C2QGD5YQG6EE9wGFddTxqMdUwELuB",
        // Mainnet key on testnet
        "XBroosGSTa6KnTyDrbYhvehvazzrMbXwpYzGKZhesBXePig6zouV",
    ];
    for wif in cases {
        assert!(
            matches!(
                KeyPair::from_wif(wif, Network::DashTestnet),
                Err(SignError::InvalidPrivateKey(_))
            ),
            "{} decoded",
            wif
        );
    }
}

#[test]
fn test_invalid_addresses() {
    let cases = [
        "",
        "ygFX7C2QGD5YQG6EE9wGFddTxqMdUwELuC",
        "Xyhf4LaHDwSwzND5HEv72qoqrsg625rCMt",
        "cV9nTtEJwgLe7pmSALvzrtQbjtP7zg8phhzDqgEURvWTEmSAVGjH",
    ];
    for address in cases {
        assert!(
            matches!(
                Address::parse(address, Network::DashTestnet),
                Err(SignError::InvalidAddress(_))
            ),
            "{} parsed",
            address
        );
    }
}

#[test]
fn test_error_classification() {
    assert!(SignError::MalformedData("x".into()).is_client_error());
    assert!(SignError::NoMatchingKey { input_index: 0 }.is_client_error());
    assert!(SignError::UnsupportedSighashType(2).is_client_error());
    assert!(!SignError::signing_failure("x").is_client_error());
    assert_eq!(
        SignError::signing_failure("bad nonce").for_input(3).to_string(),
        "Signing failed for input 3: bad nonce"
    );
}
