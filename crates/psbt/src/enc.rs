//! Address decoding: bech32/bech32m witness programs and base58check legacy
//! addresses, turned into script pubkeys for the given network.

use bech32::{FromBase32, Variant};

use utxo_tx::Network;

use crate::PsbtError;

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;
const OP_EQUAL: u8 = 0x87;

/// The bech32 human-readable part for a network.
fn hrp(network: Network) -> &'static str {
    match network {
        Network::Mainnet => "bc",
        Network::Testnet => "tb",
    }
}

/// Base58check version bytes `(p2pkh, p2sh)` for a network.
fn base58_versions(network: Network) -> (u8, u8) {
    match network {
        Network::Mainnet => (0x00, 0x05),
        Network::Testnet => (0x6f, 0xc4),
    }
}

/// Decode `address` into the script pubkey it pays, rejecting addresses for
/// the wrong network. Supports witness v0 (P2WPKH/P2WSH), witness v1
/// (P2TR), P2PKH, and P2SH.
pub fn decode_address(address: &str, network: Network) -> Result<Vec<u8>, PsbtError> {
    let bad = || PsbtError::BadAddress(address.to_owned());

    if let Ok((found_hrp, data, variant)) = bech32::decode(address) {
        if found_hrp != hrp(network) {
            return Err(bad());
        }
        let (version, program) = data.split_first().ok_or_else(bad)?;
        let version = version.to_u8();
        let program = Vec::<u8>::from_base32(program).map_err(|_| bad())?;

        // BIP-173/350 rules: v0 is bech32 with 20- or 32-byte programs,
        // higher versions are bech32m
        let valid = match version {
            0 => variant == Variant::Bech32 && (program.len() == 20 || program.len() == 32),
            1..=16 => variant == Variant::Bech32m && (2..=40).contains(&program.len()),
            _ => false,
        };
        if !valid {
            return Err(bad());
        }

        let version_op = if version == 0 { 0x00 } else { 0x50 + version };
        let mut script = Vec::with_capacity(program.len() + 2);
        script.push(version_op);
        script.push(program.len() as u8);
        script.extend(program);
        return Ok(script);
    }

    let payload = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|_| bad())?;
    if payload.len() != 21 {
        return Err(bad());
    }
    let (p2pkh, p2sh) = base58_versions(network);
    let hash = &payload[1..];
    let script = if payload[0] == p2pkh {
        let mut v = vec![OP_DUP, OP_HASH160, 0x14];
        v.extend(hash);
        v.extend([OP_EQUALVERIFY, OP_CHECKSIG]);
        v
    } else if payload[0] == p2sh {
        let mut v = vec![OP_HASH160, 0x14];
        v.extend(hash);
        v.push(OP_EQUAL);
        v
    } else {
        return Err(bad());
    };
    Ok(script)
}

#[cfg(test)]
mod test {
    use super::*;
    use bech32::ToBase32;

    #[test]
    fn it_decodes_p2pkh_addresses() {
        // The genesis coinbase address
        let script = decode_address("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", Network::Mainnet).unwrap();
        assert_eq!(
            hex::encode(script),
            "76a91462e907b15cbf27d5425399ebf6f0fb50ebb88f1888ac"
        );
    }

    #[test]
    fn it_decodes_p2sh_addresses() {
        let hash = [0x11u8; 20];
        let mut payload = vec![0x05];
        payload.extend(hash);
        let addr = bs58::encode(payload).with_check().into_string();

        let script = decode_address(&addr, Network::Mainnet).unwrap();
        assert_eq!(script[0], OP_HASH160);
        assert_eq!(script[1], 0x14);
        assert_eq!(&script[2..22], &hash);
        assert_eq!(script[22], OP_EQUAL);
    }

    #[test]
    fn it_decodes_witness_v0_addresses() {
        // BIP-173 example program
        let script = decode_address(
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
            Network::Mainnet,
        )
        .unwrap();
        assert_eq!(
            hex::encode(script),
            "0014751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn it_decodes_witness_v1_addresses() {
        let program = [0x33u8; 32];
        let mut data = vec![bech32::u5::try_from_u8(1).unwrap()];
        data.extend(program.to_base32());
        let addr = bech32::encode("tb", data, Variant::Bech32m).unwrap();

        let script = decode_address(&addr, Network::Testnet).unwrap();
        assert_eq!(script[0], 0x51);
        assert_eq!(script[1], 0x20);
        assert_eq!(&script[2..], &program);
    }

    #[test]
    fn it_rejects_wrong_network_and_garbage() {
        let cases = [
            // mainnet bech32 on testnet
            ("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", Network::Testnet),
            // mainnet base58 on testnet
            ("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", Network::Testnet),
            ("not-an-address", Network::Mainnet),
            ("", Network::Mainnet),
        ];
        for (addr, network) in cases.iter() {
            assert!(matches!(
                decode_address(addr, *network),
                Err(PsbtError::BadAddress(_))
            ));
        }
    }

    #[test]
    fn it_rejects_v0_with_bech32m_checksum() {
        let mut data = vec![bech32::u5::try_from_u8(0).unwrap()];
        data.extend([0x22u8; 20].to_base32());
        let addr = bech32::encode("bc", data, Variant::Bech32m).unwrap();
        assert!(decode_address(&addr, Network::Mainnet).is_err());
    }
}
